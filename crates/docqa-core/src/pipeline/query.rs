//! Grounded question answering over the vector index

use crate::error::Result;
use crate::llm::{ChatModel, EmbeddingService};
use crate::search::{rerank_matches, LexicalOverlapScorer, MatchScorer, RankedMatch};
use crate::vector::IndexManager;
use std::sync::Arc;

/// Nearest neighbors fetched before reranking
pub const QUERY_TOP_K: usize = 5;

/// Generated answer plus human-readable source citations
#[derive(Debug, Clone)]
pub struct QueryAnswer {
    pub answer: String,
    /// One `"Page P of filename"` entry per reranked match
    pub sources: Vec<String>,
}

/// Answers questions from retrieved document excerpts
pub struct QueryPipeline {
    embeddings: Arc<EmbeddingService>,
    index: Arc<IndexManager>,
    chat: Arc<dyn ChatModel>,
    scorer: Box<dyn MatchScorer>,
}

impl QueryPipeline {
    pub fn new(
        embeddings: Arc<EmbeddingService>,
        index: Arc<IndexManager>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            embeddings,
            index,
            chat,
            scorer: Box::new(LexicalOverlapScorer),
        }
    }

    /// Substitute the secondary reranking signal
    pub fn with_scorer(mut self, scorer: Box<dyn MatchScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Retrieve, rerank and answer. Any failure along the way is fatal for
    /// the query; no degraded answer is synthesized.
    pub async fn answer(&self, question: &str) -> Result<QueryAnswer> {
        let query_embedding = self.embeddings.embed_one(question).await?;
        self.index.ensure_index(query_embedding.len()).await?;

        let matches = self.index.query(&query_embedding, QUERY_TOP_K).await?;
        let ranked = rerank_matches(matches, question, self.scorer.as_ref());

        let context = format_context(&ranked);
        let prompt = build_prompt(&context, question);

        tracing::debug!(question, matches = ranked.len(), "generating answer");
        let answer = self.chat.generate(&prompt).await?;

        Ok(QueryAnswer {
            answer,
            sources: format_sources(&ranked),
        })
    }
}

/// Delimited context block handed to the model
fn format_context(matches: &[RankedMatch]) -> String {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let page = m
                .metadata
                .page
                .map(|p| p.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            format!("[Excerpt {} from page {}]:\n{}\n", i + 1, page, m.metadata.text.trim())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_prompt(context: &str, question: &str) -> String {
    format!(
        r#"Based on the following excerpts from a document, please answer the question accurately and completely. If the information needed to answer the question is not fully contained in the excerpts, please indicate this clearly.

Excerpts from document:
{context}

Question: {question}

Instructions:
1. Use only information from the provided excerpts
2. If the answer requires information not present in the excerpts, say so
3. If different excerpts contain contradicting information, point this out
4. Cite the excerpt numbers when providing information

Answer:"#
    )
}

fn format_sources(matches: &[RankedMatch]) -> Vec<String> {
    matches
        .iter()
        .map(|m| {
            let page = m
                .metadata
                .page
                .map(|p| p.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            format!("Page {} of {}", page, m.metadata.source)
        })
        .collect()
}
