//! DocQA Core Library
//!
//! Retrieval-augmented question answering over uploaded documents.
//!
//! # Features
//! - Overlapping fixed-size chunking with page metadata
//! - Batched embedding generation with a FIFO content-hash cache
//! - Remote vector index management (lazy create, destructive resize)
//! - Lexical-overlap reranking on top of vector similarity
//! - Background ingestion with per-task progress tracking

pub mod config;
pub mod error;
pub mod extract;
pub mod index;
pub mod llm;
pub mod pipeline;
pub mod search;
pub mod vector;

pub use config::{Config, ConverterConfig, LlmServiceConfig, VectorStoreConfig};
pub use error::{DocQaError, Error, Result};
pub use extract::{
    validate_file_type, DocumentConverter, DocumentExtractor, DocumentInfo, FileType,
    HttpConverter, PdfExtractTool, PdfExtractor,
};
pub use index::{chunk_text, Chunk, CHUNK_SIZE, OVERLAP_SIZE};
pub use llm::{
    ChatModel, Embedder, EmbeddingCache, EmbeddingService, OpenAiCompatClient, CACHE_SIZE,
};
pub use pipeline::{
    IngestCoordinator, ProcessingStatus, QueryAnswer, QueryPipeline, TaskState, BATCH_SIZE,
};
pub use search::{rerank_matches, LexicalOverlapScorer, MatchScorer, RankedMatch, TOP_RESULTS};
pub use vector::{
    HttpVectorStore, IndexInfo, IndexManager, MemoryVectorStore, QueryMatch, StoredVector,
    VectorMetadata, VectorStore,
};
