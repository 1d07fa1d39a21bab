//! Configuration for external services

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM service configuration (chat + embeddings)
    #[serde(default)]
    pub llm_service: LlmServiceConfig,

    /// Vector store configuration
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Office-document conversion service configuration
    #[serde(default)]
    pub converter: ConverterConfig,
}

/// LLM service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmServiceConfig {
    /// Base URL of the LLM service for chat/completions
    pub url: String,

    /// Model name for answer generation
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LlmServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for LlmServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DOCQA_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            model: default_chat_model(),
            embedding_url: std::env::var("DOCQA_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            api_key: std::env::var("DOCQA_LLM_API_KEY").ok(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_chat_model() -> String {
    std::env::var("DOCQA_LLM_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("DOCQA_EMBEDDING_MODEL").unwrap_or_else(|_| "text-embedding-004".to_string())
}

fn default_timeout() -> u64 {
    30
}

/// Remote vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Base URL of the vector store control/data plane
    pub url: String,

    /// Name of the index holding document embeddings
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// API key (optional)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Seconds between readiness polls while creating or deleting an index
    #[serde(default = "default_poll_secs")]
    pub poll_interval_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DOCQA_VECTOR_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            index_name: std::env::var("DOCQA_INDEX_NAME").unwrap_or_else(|_| default_index_name()),
            api_key: std::env::var("DOCQA_VECTOR_API_KEY").ok(),
            poll_interval_secs: default_poll_secs(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_index_name() -> String {
    "file-embeddings".to_string()
}

fn default_poll_secs() -> u64 {
    1
}

/// Office-document conversion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Base URL of the document-to-markdown conversion service
    pub url: String,

    /// Request timeout in seconds; conversions of large documents are slow
    #[serde(default = "default_converter_timeout")]
    pub timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DOCQA_CONVERTER_URL")
                .unwrap_or_else(|_| "http://localhost:9100".to_string()),
            timeout_secs: default_converter_timeout(),
        }
    }
}

fn default_converter_timeout() -> u64 {
    120
}
