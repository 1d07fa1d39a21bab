//! In-memory vector store for tests and local development

use crate::error::{DocQaError, Result};
use crate::vector::{IndexInfo, QueryMatch, StoredVector, VectorStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

struct MemoryIndex {
    dimension: usize,
    vectors: HashMap<String, StoredVector>,
}

/// Process-local [`VectorStore`] with brute-force cosine queries.
///
/// Indexes report ready immediately after creation.
#[derive(Default)]
pub struct MemoryVectorStore {
    indexes: Mutex<HashMap<String, MemoryIndex>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vectors currently held in an index
    pub fn vector_count(&self, name: &str) -> usize {
        self.indexes
            .lock()
            .expect("memory store poisoned")
            .get(name)
            .map(|i| i.vectors.len())
            .unwrap_or(0)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let indexes = self.indexes.lock().expect("memory store poisoned");
        Ok(indexes.keys().cloned().collect())
    }

    async fn create_index(&self, name: &str, dimension: usize, _metric: &str) -> Result<()> {
        let mut indexes = self.indexes.lock().expect("memory store poisoned");
        indexes.insert(
            name.to_string(),
            MemoryIndex {
                dimension,
                vectors: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn describe_index(&self, name: &str) -> Result<IndexInfo> {
        let indexes = self.indexes.lock().expect("memory store poisoned");
        let index = indexes
            .get(name)
            .ok_or_else(|| DocQaError::Index(format!("no such index: {name}")))?;
        Ok(IndexInfo {
            dimension: index.dimension,
            ready: true,
        })
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let mut indexes = self.indexes.lock().expect("memory store poisoned");
        indexes.remove(name);
        Ok(())
    }

    async fn upsert(&self, name: &str, vectors: &[StoredVector]) -> Result<()> {
        let mut indexes = self.indexes.lock().expect("memory store poisoned");
        let index = indexes
            .get_mut(name)
            .ok_or_else(|| DocQaError::Index(format!("no such index: {name}")))?;
        for vector in vectors {
            index.vectors.insert(vector.id.clone(), vector.clone());
        }
        Ok(())
    }

    async fn query(&self, name: &str, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        let indexes = self.indexes.lock().expect("memory store poisoned");
        let index = indexes
            .get(name)
            .ok_or_else(|| DocQaError::Index(format!("no such index: {name}")))?;

        let mut matches: Vec<QueryMatch> = index
            .vectors
            .values()
            .map(|stored| QueryMatch {
                id: stored.id.clone(),
                score: cosine_similarity(vector, &stored.values),
                metadata: stored.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete(&self, name: &str, ids: &[String]) -> Result<()> {
        let mut indexes = self.indexes.lock().expect("memory store poisoned");
        let index = indexes
            .get_mut(name)
            .ok_or_else(|| DocQaError::Index(format!("no such index: {name}")))?;
        for id in ids {
            index.vectors.remove(id);
        }
        Ok(())
    }
}
