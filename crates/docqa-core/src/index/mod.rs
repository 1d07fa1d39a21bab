//! Text chunking for embedding and retrieval

mod chunker;

pub use chunker::{chunk_text, Chunk, CHUNK_SIZE, OVERLAP_SIZE};
