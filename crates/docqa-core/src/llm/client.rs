//! HTTP client for OpenAI-compatible inference services

use crate::config::LlmServiceConfig;
use crate::error::{DocQaError, Result};
use crate::llm::{ChatModel, Embedder};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for an OpenAI-compatible embedding + chat service
pub struct OpenAiCompatClient {
    http_client: reqwest::Client,
    config: LlmServiceConfig,
}

impl OpenAiCompatClient {
    /// Create a new client from configuration
    pub fn new(config: LlmServiceConfig) -> Result<Self> {
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
        Self::new(LlmServiceConfig::default())
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            req.header("Authorization", format!("Bearer {}", api_key))
        } else {
            req
        }
    }
}

#[async_trait]
impl Embedder for OpenAiCompatClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            data: Vec<EmbedData>,
        }

        #[derive(Deserialize)]
        struct EmbedData {
            embedding: Vec<f32>,
        }

        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: text,
        };

        let url = format!("{}/v1/embeddings", self.config.embeddings_url());
        let req = self.authorize(self.http_client.post(&url).json(&request));

        let response = req.send().await.map_err(DocQaError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocQaError::ExternalError(format!(
                "Embedding service error (HTTP {}): {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response.json().await.map_err(DocQaError::Http)?;

        embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DocQaError::Llm("No embedding returned".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_model
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: String,
        }

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
        };

        let url = format!("{}/v1/chat/completions", self.config.url);
        let req = self.authorize(self.http_client.post(&url).json(&request));

        let response = req.send().await.map_err(DocQaError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocQaError::ExternalError(format!(
                "LLM service error (HTTP {}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(DocQaError::Http)?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DocQaError::Llm("No response from LLM".to_string()))?
            .message
            .content;

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
