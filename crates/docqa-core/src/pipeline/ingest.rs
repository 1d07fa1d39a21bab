//! Background document ingestion with progress tracking

use crate::error::{DocQaError, Result};
use crate::extract::DocumentExtractor;
use crate::index::Chunk;
use crate::llm::EmbeddingService;
use crate::vector::{IndexManager, StoredVector, VectorMetadata};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Chunks embedded and upserted per batch
pub const BATCH_SIZE: usize = 50;

/// Vector ids deleted per remote call
const DELETE_BATCH_SIZE: usize = 100;

/// Lifecycle of an ingestion task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Processing,
    Completed,
    Failed,
}

/// Progress record for one ingestion task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub status: TaskState,
    /// 0..=100
    pub progress: f64,
    pub processed_chunks: usize,
    pub total_chunks: usize,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl ProcessingStatus {
    fn new(filename: &str) -> Self {
        Self {
            status: TaskState::Processing,
            progress: 0.0,
            processed_chunks: 0,
            total_chunks: 0,
            filename: filename.to_string(),
            error: None,
            started_at: Utc::now(),
        }
    }
}

/// Drives extraction, batched embedding and indexing for uploaded documents.
///
/// Owns all ingestion state: the per-task status map and the registry of
/// vector ids produced per filename. Ingestion runs detached from the caller;
/// progress is observed through [`IngestCoordinator::status`].
#[derive(Clone)]
pub struct IngestCoordinator {
    extractor: Arc<DocumentExtractor>,
    embeddings: Arc<EmbeddingService>,
    index: Arc<IndexManager>,
    statuses: Arc<Mutex<HashMap<String, ProcessingStatus>>>,
    registry: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl IngestCoordinator {
    pub fn new(
        extractor: Arc<DocumentExtractor>,
        embeddings: Arc<EmbeddingService>,
        index: Arc<IndexManager>,
    ) -> Self {
        Self {
            extractor,
            embeddings,
            index,
            statuses: Arc::new(Mutex::new(HashMap::new())),
            registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Kick off background ingestion of a document; returns the task id.
    ///
    /// The task runs detached. Failures are recorded in the status map, not
    /// returned here.
    pub fn start_ingest(&self, bytes: Vec<u8>, filename: String) -> String {
        let task_id = task_id_for(&filename);

        self.statuses
            .lock()
            .expect("status map poisoned")
            .insert(task_id.clone(), ProcessingStatus::new(&filename));

        let coordinator = self.clone();
        let id = task_id.clone();
        tokio::spawn(async move {
            coordinator.run_ingest(bytes, filename, id).await;
        });

        task_id
    }

    /// Run an ingestion task to completion, recording the terminal state
    pub async fn run_ingest(&self, bytes: Vec<u8>, filename: String, task_id: String) {
        match self.ingest(&bytes, &filename, &task_id).await {
            Ok(()) => {
                tracing::info!(%task_id, %filename, "ingestion completed");
                self.update_status(&task_id, |status| {
                    status.status = TaskState::Completed;
                });
            }
            Err(e) => {
                tracing::error!(%task_id, %filename, error = %e, "ingestion failed");
                self.update_status(&task_id, |status| {
                    status.status = TaskState::Failed;
                    status.error = Some(e.to_string());
                });
            }
        }
    }

    async fn ingest(&self, bytes: &[u8], filename: &str, task_id: &str) -> Result<()> {
        let chunks = self
            .extractor
            .process_document_content(bytes, filename)
            .await?;

        self.update_status(task_id, |status| {
            status.total_chunks = chunks.len();
            status.processed_chunks = 0;
        });

        if chunks.is_empty() {
            return Ok(());
        }

        // Commit the dimension once before batches fan out, so concurrent
        // batches cannot disagree on what the index was created with.
        let dimension = self.embeddings.probe_dimension(&chunks[0].text).await?;
        self.index.ensure_index(dimension).await?;

        try_join_all(
            chunks
                .chunks(BATCH_SIZE)
                .map(|batch| self.process_batch(batch, filename, task_id, dimension)),
        )
        .await?;

        Ok(())
    }

    /// Embed, register and upsert one batch, then bump progress.
    ///
    /// Already-upserted batches are not rolled back when a later batch
    /// fails; partial ingestion stays visible.
    async fn process_batch(
        &self,
        batch: &[Chunk],
        filename: &str,
        task_id: &str,
        dimension: usize,
    ) -> Result<()> {
        let texts: Vec<String> = batch.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = self.embeddings.embed_batch(&texts).await?;

        let mut vectors = Vec::with_capacity(batch.len());
        for (chunk, embedding) in batch.iter().zip(embeddings) {
            if embedding.len() != dimension {
                return Err(DocQaError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
            vectors.push(StoredVector {
                id: format!("{}-chunk-{}", filename, chunk.index),
                values: embedding,
                metadata: VectorMetadata {
                    text: chunk.text.clone(),
                    source: filename.to_string(),
                    page: chunk.page,
                },
            });
        }

        {
            let mut registry = self.registry.lock().expect("registry poisoned");
            let ids = registry.entry(filename.to_string()).or_default();
            ids.extend(vectors.iter().map(|v| v.id.clone()));
        }

        self.index.upsert(&vectors).await?;

        self.update_status(task_id, |status| {
            status.processed_chunks += batch.len();
            status.progress =
                status.processed_chunks as f64 / status.total_chunks as f64 * 100.0;
        });

        Ok(())
    }

    /// Current status of a task, if known
    pub fn status(&self, task_id: &str) -> Option<ProcessingStatus> {
        self.statuses
            .lock()
            .expect("status map poisoned")
            .get(task_id)
            .cloned()
    }

    /// Filenames with vectors recorded in the registry
    pub fn documents(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .lock()
            .expect("registry poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Vector ids recorded for a filename
    pub fn vector_ids(&self, filename: &str) -> Option<Vec<String>> {
        self.registry
            .lock()
            .expect("registry poisoned")
            .get(filename)
            .cloned()
    }

    /// Remove a document's vectors from the index and drop its registry
    /// entry. The entry survives if a remote delete fails partway.
    pub async fn delete_document(&self, filename: &str) -> Result<()> {
        let ids = self
            .vector_ids(filename)
            .ok_or_else(|| DocQaError::DocumentNotFound(filename.to_string()))?;

        for id_batch in ids.chunks(DELETE_BATCH_SIZE) {
            self.index.delete(id_batch).await?;
        }

        self.registry
            .lock()
            .expect("registry poisoned")
            .remove(filename);
        tracing::info!(filename, vectors = ids.len(), "document deleted");
        Ok(())
    }

    fn update_status(&self, task_id: &str, apply: impl FnOnce(&mut ProcessingStatus)) {
        let mut statuses = self.statuses.lock().expect("status map poisoned");
        if let Some(status) = statuses.get_mut(task_id) {
            apply(status);
        }
    }
}

/// Deterministic task id derived from the filename
fn task_id_for(filename: &str) -> String {
    let digest = Sha256::digest(filename.as_bytes());
    format!("task_{:x}", digest)
}
