//! Batched embedding generation with a cache-first policy

use crate::error::{DocQaError, Result};
use crate::llm::{Embedder, EmbeddingCache};
use futures::future::try_join_all;
use std::sync::Arc;

/// Embedding front-end shared by ingestion and query paths.
///
/// Resolves texts through the FIFO cache first and dispatches only the
/// misses to the underlying embedder, concurrently. Output order always
/// matches input order regardless of the hit/miss pattern.
pub struct EmbeddingService {
    embedder: Arc<dyn Embedder>,
    cache: EmbeddingCache,
}

impl EmbeddingService {
    /// Create a service with the default cache capacity
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            cache: EmbeddingCache::new(),
        }
    }

    /// Create a service with a custom cache
    pub fn with_cache(embedder: Arc<dyn Embedder>, cache: EmbeddingCache) -> Self {
        Self { embedder, cache }
    }

    /// Embed a batch of texts, preserving input order.
    ///
    /// Any failure of an underlying embedding call fails the whole batch.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut resolved: Vec<(usize, Vec<f32>)> = Vec::with_capacity(texts.len());
        let mut miss_texts: Vec<&String> = Vec::new();
        let mut miss_indices: Vec<usize> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            match self.cache.get(text) {
                Some(embedding) => resolved.push((i, embedding)),
                None => {
                    miss_texts.push(text);
                    miss_indices.push(i);
                }
            }
        }

        if !miss_texts.is_empty() {
            tracing::debug!(
                cached = texts.len() - miss_texts.len(),
                to_fetch = miss_texts.len(),
                "embedding batch"
            );

            let embeddings = try_join_all(
                miss_texts.iter().map(|text| self.embedder.embed(text.as_str())),
            )
            .await?;

            for (text, embedding) in miss_texts.iter().zip(embeddings.iter()) {
                self.cache.put(text.as_str(), embedding.clone());
            }

            resolved.extend(miss_indices.into_iter().zip(embeddings));
        }

        resolved.sort_by_key(|(i, _)| *i);
        Ok(resolved.into_iter().map(|(_, emb)| emb).collect())
    }

    /// Embed a single text with the same cache-first policy
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(embedding) = self.cache.get(text) {
            return Ok(embedding);
        }
        let embedding = self.embedder.embed(text).await?;
        self.cache.put(text, embedding.clone());
        Ok(embedding)
    }

    /// Resolve the embedding dimension by probing a single text.
    ///
    /// Used once per ingestion task, before batches fan out, so all batches
    /// agree on the dimension committed to the index.
    pub async fn probe_dimension(&self, text: &str) -> Result<usize> {
        let embedding = self.embed_one(text).await?;
        if embedding.is_empty() {
            return Err(DocQaError::Llm(
                "Embedding service returned an empty vector".to_string(),
            ));
        }
        Ok(embedding.len())
    }

    /// Name of the underlying embedding model
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }
}
