//! Shared fakes for pipeline integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use docqa_core::{
    ChatModel, DocQaError, DocumentConverter, DocumentExtractor, Embedder, EmbeddingService,
    IndexManager, IngestCoordinator, MemoryVectorStore, PdfExtractor, QueryPipeline, Result,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Deterministic embedder: 3-dim vectors where the second component marks
/// texts mentioning "refund", so retrieval tests have a known winner.
pub struct TestEmbedder {
    pub calls: AtomicUsize,
    /// Texts containing this substring fail the embedding call
    pub fail_on: Option<String>,
    /// Texts containing this substring come back with 4 dimensions
    pub oversized_on: Option<String>,
}

impl TestEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: None,
            oversized_on: None,
        }
    }

    pub fn failing_on(substring: &str) -> Self {
        Self {
            fail_on: Some(substring.to_string()),
            ..Self::new()
        }
    }

    pub fn oversized_on(substring: &str) -> Self {
        Self {
            oversized_on: Some(substring.to_string()),
            ..Self::new()
        }
    }
}

#[async_trait]
impl Embedder for TestEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref s) = self.fail_on {
            if text.contains(s.as_str()) {
                return Err(DocQaError::ExternalError(
                    "embedding backend rejected text".to_string(),
                ));
            }
        }
        if let Some(ref s) = self.oversized_on {
            if text.contains(s.as_str()) {
                return Ok(vec![0.5, 0.5, 0.5, 0.5]);
            }
        }
        let refund = if text.to_lowercase().contains("refund") {
            1.0
        } else {
            0.0
        };
        Ok(vec![1.0, refund, 0.0])
    }

    fn model_name(&self) -> &str {
        "test-embedder"
    }
}

/// Chat model that records every prompt it sees
pub struct TestChat {
    pub prompts: Mutex<Vec<String>>,
    pub reply: String,
}

impl TestChat {
    pub fn new(reply: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatModel for TestChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "test-chat"
    }
}

/// PDF seam returning canned page texts
pub struct TestPdf {
    pub pages: Vec<String>,
}

impl PdfExtractor for TestPdf {
    fn pages(&self, _bytes: &[u8]) -> Result<Vec<String>> {
        Ok(self.pages.clone())
    }

    fn page_count(&self, _bytes: &[u8]) -> Result<usize> {
        Ok(self.pages.len())
    }
}

/// Converter seam returning canned markdown
pub struct TestConverter {
    pub markdown: String,
}

#[async_trait]
impl DocumentConverter for TestConverter {
    async fn convert(&self, _path: &Path) -> Result<String> {
        Ok(self.markdown.clone())
    }
}

/// Everything a pipeline test needs, wired over in-memory fakes
pub struct TestStack {
    pub coordinator: IngestCoordinator,
    pub store: Arc<MemoryVectorStore>,
    pub embeddings: Arc<EmbeddingService>,
    pub index: Arc<IndexManager>,
    pub embedder: Arc<TestEmbedder>,
}

impl TestStack {
    pub fn query_pipeline(&self, chat: Arc<TestChat>) -> QueryPipeline {
        QueryPipeline::new(self.embeddings.clone(), self.index.clone(), chat)
    }
}

pub fn stack_with(embedder: TestEmbedder, pdf_pages: Vec<String>) -> TestStack {
    let embedder = Arc::new(embedder);
    let embeddings = Arc::new(EmbeddingService::new(embedder.clone()));
    let store = Arc::new(MemoryVectorStore::new());
    let index = Arc::new(
        IndexManager::new(store.clone(), "test-index")
            .with_poll_interval(Duration::from_millis(1)),
    );
    let extractor = Arc::new(DocumentExtractor::new(
        Arc::new(TestPdf { pages: pdf_pages }),
        Arc::new(TestConverter {
            markdown: String::new(),
        }),
    ));
    let coordinator = IngestCoordinator::new(extractor, embeddings.clone(), index.clone());

    TestStack {
        coordinator,
        store,
        embeddings,
        index,
        embedder,
    }
}

pub fn stack() -> TestStack {
    stack_with(TestEmbedder::new(), Vec::new())
}

/// Whitespace words "w0 w1 ... w{n-1}"
pub fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

/// Opt-in log output for debugging test runs (RUST_LOG=debug)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
