//! Remote vector index access and lifecycle management

mod http;
mod manager;
mod memory;

pub use http::HttpVectorStore;
pub use manager::IndexManager;
pub use memory::MemoryVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Similarity metric used for every index this crate creates
pub const METRIC: &str = "cosine";

/// Metadata stored alongside each vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorMetadata {
    pub text: String,
    /// Originating filename
    pub source: String,
    /// 1-based page number, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// A vector as persisted in the remote index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVector {
    /// Deterministic id, derived from filename and chunk index
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VectorMetadata,
}

/// One nearest-neighbor match returned by a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    /// Similarity score reported by the store
    pub score: f64,
    pub metadata: VectorMetadata,
}

/// Remote index description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    pub dimension: usize,
    pub ready: bool,
}

/// Remote vector store operations
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Names of all indexes present in the store
    async fn list_indexes(&self) -> Result<Vec<String>>;

    /// Create an index; the store may report it not-ready for a while
    async fn create_index(&self, name: &str, dimension: usize, metric: &str) -> Result<()>;

    /// Describe an existing index
    async fn describe_index(&self, name: &str) -> Result<IndexInfo>;

    /// Destroy an index and everything in it
    async fn delete_index(&self, name: &str) -> Result<()>;

    /// Insert or overwrite vectors by id
    async fn upsert(&self, name: &str, vectors: &[StoredVector]) -> Result<()>;

    /// Nearest-neighbor query with metadata
    async fn query(&self, name: &str, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>>;

    /// Delete vectors by id
    async fn delete(&self, name: &str, ids: &[String]) -> Result<()>;
}
