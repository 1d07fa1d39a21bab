//! Ingestion and query orchestration

mod ingest;
mod query;

pub use ingest::{IngestCoordinator, ProcessingStatus, TaskState, BATCH_SIZE};
pub use query::{QueryAnswer, QueryPipeline, QUERY_TOP_K};
