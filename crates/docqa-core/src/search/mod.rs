//! Result reranking

mod rerank;

pub use rerank::{rerank_matches, LexicalOverlapScorer, MatchScorer, RankedMatch, TOP_RESULTS};
