//! Office-document conversion through an external markdown converter

use crate::config::ConverterConfig;
use crate::error::{DocQaError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Converts an office document on disk into markdown-like text
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, path: &Path) -> Result<String>;
}

/// Converter client posting file contents to an HTTP conversion service
pub struct HttpConverter {
    http_client: reqwest::Client,
    config: ConverterConfig,
}

impl HttpConverter {
    /// Create a new client from configuration
    pub fn new(config: ConverterConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(DocQaError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ConverterConfig::default())
    }
}

#[async_trait]
impl DocumentConverter for HttpConverter {
    async fn convert(&self, path: &Path) -> Result<String> {
        #[derive(Deserialize)]
        struct ConvertResponse {
            markdown: String,
        }

        let bytes = tokio::fs::read(path).await?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();

        let url = format!("{}/convert", self.config.url);
        let response = self
            .http_client
            .post(&url)
            .query(&[("extension", extension.as_str())])
            .body(bytes)
            .send()
            .await
            .map_err(DocQaError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocQaError::Conversion(format!(
                "conversion service error (HTTP {}): {}",
                status, body
            )));
        }

        let converted: ConvertResponse = response.json().await.map_err(DocQaError::Http)?;
        Ok(converted.markdown)
    }
}
