//! HTTP client for a remote vector store

use crate::config::VectorStoreConfig;
use crate::error::{DocQaError, Result};
use crate::vector::{IndexInfo, QueryMatch, StoredVector, VectorStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Vector store client speaking a Pinecone-style REST API
pub struct HttpVectorStore {
    http_client: reqwest::Client,
    config: VectorStoreConfig,
}

impl HttpVectorStore {
    /// Create a new client from configuration
    pub fn new(config: VectorStoreConfig) -> Result<Self> {
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
        Self::new(VectorStoreConfig::default())
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            req.header("Api-Key", api_key)
        } else {
            req
        }
    }

    async fn check(&self, response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(DocQaError::ExternalError(format!(
            "Vector store error during {} (HTTP {}): {}",
            context, status, body
        )))
    }
}

#[async_trait]
impl VectorStore for HttpVectorStore {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct ListResponse {
            indexes: Vec<IndexEntry>,
        }

        #[derive(Deserialize)]
        struct IndexEntry {
            name: String,
        }

        let url = format!("{}/indexes", self.config.url);
        let req = self.authorize(self.http_client.get(&url));
        let response = self.check(req.send().await?, "list_indexes").await?;
        let list: ListResponse = response.json().await.map_err(DocQaError::Http)?;
        Ok(list.indexes.into_iter().map(|i| i.name).collect())
    }

    async fn create_index(&self, name: &str, dimension: usize, metric: &str) -> Result<()> {
        #[derive(Serialize)]
        struct CreateRequest<'a> {
            name: &'a str,
            dimension: usize,
            metric: &'a str,
        }

        let request = CreateRequest {
            name,
            dimension,
            metric,
        };

        let url = format!("{}/indexes", self.config.url);
        let req = self.authorize(self.http_client.post(&url).json(&request));
        self.check(req.send().await?, "create_index").await?;
        Ok(())
    }

    async fn describe_index(&self, name: &str) -> Result<IndexInfo> {
        #[derive(Deserialize)]
        struct DescribeResponse {
            dimension: usize,
            status: DescribeStatus,
        }

        #[derive(Deserialize)]
        struct DescribeStatus {
            ready: bool,
        }

        let url = format!("{}/indexes/{}", self.config.url, name);
        let req = self.authorize(self.http_client.get(&url));
        let response = self.check(req.send().await?, "describe_index").await?;
        let info: DescribeResponse = response.json().await.map_err(DocQaError::Http)?;
        Ok(IndexInfo {
            dimension: info.dimension,
            ready: info.status.ready,
        })
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let url = format!("{}/indexes/{}", self.config.url, name);
        let req = self.authorize(self.http_client.delete(&url));
        self.check(req.send().await?, "delete_index").await?;
        Ok(())
    }

    async fn upsert(&self, name: &str, vectors: &[StoredVector]) -> Result<()> {
        #[derive(Serialize)]
        struct UpsertRequest<'a> {
            vectors: &'a [StoredVector],
        }

        let url = format!("{}/indexes/{}/vectors/upsert", self.config.url, name);
        let req = self
            .authorize(self.http_client.post(&url).json(&UpsertRequest { vectors }));
        self.check(req.send().await?, "upsert").await?;
        Ok(())
    }

    async fn query(&self, name: &str, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        #[derive(Serialize)]
        struct QueryRequest<'a> {
            vector: &'a [f32],
            top_k: usize,
            include_metadata: bool,
        }

        #[derive(Deserialize)]
        struct QueryResponse {
            matches: Vec<QueryMatch>,
        }

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };

        let url = format!("{}/indexes/{}/query", self.config.url, name);
        let req = self.authorize(self.http_client.post(&url).json(&request));
        let response = self.check(req.send().await?, "query").await?;
        let result: QueryResponse = response.json().await.map_err(DocQaError::Http)?;
        Ok(result.matches)
    }

    async fn delete(&self, name: &str, ids: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct DeleteRequest<'a> {
            ids: &'a [String],
        }

        let url = format!("{}/indexes/{}/vectors/delete", self.config.url, name);
        let req = self.authorize(self.http_client.post(&url).json(&DeleteRequest { ids }));
        self.check(req.send().await?, "delete").await?;
        Ok(())
    }
}
