//! Index lifecycle management

use crate::error::Result;
use crate::vector::{QueryMatch, StoredVector, VectorStore, METRIC};
use std::sync::Arc;
use std::time::Duration;

/// Sole authority over the document index in the remote store.
///
/// Lazily creates the index to match the embedding dimension in use. If the
/// remote index exists with a different dimension it is destroyed and
/// recreated, losing all stored vectors; that operation is audit-logged
/// because it is a real data-loss event.
pub struct IndexManager {
    store: Arc<dyn VectorStore>,
    index_name: String,
    poll_interval: Duration,
}

impl IndexManager {
    pub fn new(store: Arc<dyn VectorStore>, index_name: impl Into<String>) -> Self {
        Self {
            store,
            index_name: index_name.into(),
            poll_interval: Duration::from_secs(1),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Make sure the index exists with exactly this dimension.
    ///
    /// Idempotent when the dimension already matches. A mismatched dimension
    /// triggers a destructive recreate; the call blocks until the store
    /// reports the new index ready.
    pub async fn ensure_index(&self, dimension: usize) -> Result<()> {
        let existing = self.store.list_indexes().await?;

        if !existing.iter().any(|name| name == &self.index_name) {
            tracing::info!(index = %self.index_name, dimension, "creating index");
            self.store
                .create_index(&self.index_name, dimension, METRIC)
                .await?;
        } else {
            let info = self.store.describe_index(&self.index_name).await?;
            if info.dimension != dimension {
                tracing::warn!(
                    index = %self.index_name,
                    old_dim = info.dimension,
                    new_dim = dimension,
                    "recreating index; all stored vectors will be lost"
                );
                self.store.delete_index(&self.index_name).await?;
                self.wait_until_absent().await?;
                self.store
                    .create_index(&self.index_name, dimension, METRIC)
                    .await?;
            }
        }

        self.wait_until_ready().await
    }

    async fn wait_until_absent(&self) -> Result<()> {
        loop {
            let names = self.store.list_indexes().await?;
            if !names.iter().any(|name| name == &self.index_name) {
                return Ok(());
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn wait_until_ready(&self) -> Result<()> {
        loop {
            let info = self.store.describe_index(&self.index_name).await?;
            if info.ready {
                return Ok(());
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Insert or overwrite vectors by id
    pub async fn upsert(&self, vectors: &[StoredVector]) -> Result<()> {
        self.store.upsert(&self.index_name, vectors).await
    }

    /// Nearest-neighbor query
    pub async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        self.store.query(&self.index_name, vector, top_k).await
    }

    /// Delete vectors by id
    pub async fn delete(&self, ids: &[String]) -> Result<()> {
        self.store.delete(&self.index_name, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{MemoryVectorStore, VectorMetadata};

    fn vector(id: &str, values: Vec<f32>) -> StoredVector {
        StoredVector {
            id: id.to_string(),
            values,
            metadata: VectorMetadata {
                text: "t".to_string(),
                source: "s".to_string(),
                page: None,
            },
        }
    }

    #[tokio::test]
    async fn test_ensure_index_creates_when_absent() {
        let store = Arc::new(MemoryVectorStore::new());
        let manager = IndexManager::new(store.clone(), "docs");
        manager.ensure_index(4).await.unwrap();

        let info = store.describe_index("docs").await.unwrap();
        assert_eq!(info.dimension, 4);
    }

    #[tokio::test]
    async fn test_ensure_index_same_dimension_is_idempotent() {
        let store = Arc::new(MemoryVectorStore::new());
        let manager = IndexManager::new(store.clone(), "docs");
        manager.ensure_index(4).await.unwrap();
        manager
            .upsert(&[vector("a", vec![1.0, 0.0, 0.0, 0.0])])
            .await
            .unwrap();

        manager.ensure_index(4).await.unwrap();
        assert_eq!(store.vector_count("docs"), 1, "idempotent ensure must not wipe data");
    }

    #[tokio::test]
    async fn test_ensure_index_dimension_change_recreates() {
        let store = Arc::new(MemoryVectorStore::new());
        let manager = IndexManager::new(store.clone(), "docs");
        manager.ensure_index(4).await.unwrap();
        manager
            .upsert(&[vector("a", vec![1.0, 0.0, 0.0, 0.0])])
            .await
            .unwrap();

        manager.ensure_index(8).await.unwrap();
        let info = store.describe_index("docs").await.unwrap();
        assert_eq!(info.dimension, 8);
        assert_eq!(store.vector_count("docs"), 0, "recreate is destructive");
    }
}
