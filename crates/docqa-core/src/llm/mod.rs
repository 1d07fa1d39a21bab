//! External model clients: embedding generation and answer generation

mod cache;
mod client;
mod embeddings;
mod traits;

pub use cache::{EmbeddingCache, CACHE_SIZE};
pub use client::OpenAiCompatClient;
pub use embeddings::EmbeddingService;
pub use traits::{ChatModel, Embedder};
