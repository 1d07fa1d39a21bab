//! Lexical-overlap reranking on top of vector similarity

use crate::vector::{QueryMatch, VectorMetadata};
use std::collections::HashSet;

/// Number of matches surviving the rerank
pub const TOP_RESULTS: usize = 3;

const SIMILARITY_WEIGHT: f64 = 0.6;
const SCORER_WEIGHT: f64 = 0.4;

/// Secondary relevance signal for a match against the question.
///
/// Pluggable so that a trained reranker can replace the lexical heuristic
/// without touching the pipeline.
pub trait MatchScorer: Send + Sync {
    fn score(&self, match_text: &str, question: &str) -> f64;
}

/// Counts the word-set intersection between the lowercased question and the
/// lowercased match text. No stemming; whitespace tokenization only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalOverlapScorer;

impl MatchScorer for LexicalOverlapScorer {
    fn score(&self, match_text: &str, question: &str) -> f64 {
        let question_words: HashSet<String> = question
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let text_words: HashSet<String> = match_text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        question_words.intersection(&text_words).count() as f64
    }
}

/// A match with its recombined relevance score
#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub id: String,
    /// Similarity score as reported by the vector store
    pub similarity: f64,
    /// `similarity * 0.6 + secondary_score * 0.4`
    pub combined_score: f64,
    pub metadata: VectorMetadata,
}

/// Reorder matches by combined similarity + secondary score, keeping the top
/// [`TOP_RESULTS`]. The sort is stable, so ties keep their original order.
pub fn rerank_matches(
    matches: Vec<QueryMatch>,
    question: &str,
    scorer: &dyn MatchScorer,
) -> Vec<RankedMatch> {
    let mut ranked: Vec<RankedMatch> = matches
        .into_iter()
        .map(|m| {
            let secondary = scorer.score(&m.metadata.text, question);
            RankedMatch {
                combined_score: m.score * SIMILARITY_WEIGHT + secondary * SCORER_WEIGHT,
                id: m.id,
                similarity: m.score,
                metadata: m.metadata,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(TOP_RESULTS);
    ranked
}
