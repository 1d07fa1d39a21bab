//! Overlapping fixed-size word chunking

use serde::{Deserialize, Serialize};

/// Chunk size budget in characters
pub const CHUNK_SIZE: usize = 4000;
/// Overlap budget in characters
pub const OVERLAP_SIZE: usize = 100;

/// Assumed average word length used to convert character budgets to words
const AVG_WORD_LEN: usize = 5;

/// A bounded span of document text, the unit of embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// 0-based, strictly increasing within a document
    pub index: usize,
    /// Word offset where this chunk's stride begins
    pub start_position: usize,
    /// Word offset one past the stride, clipped to the total word count.
    /// Excludes the trailing overlap words, so it is not `start_position`
    /// plus the number of words in `text`.
    pub end_position: usize,
    /// 1-based page number; estimated for non-paginated formats
    pub page: Option<u32>,
}

/// Split text into overlapping word chunks.
///
/// Steps through the whitespace-separated word sequence in strides of
/// `CHUNK_SIZE / AVG_WORD_LEN` words; each chunk additionally carries
/// `OVERLAP_SIZE / AVG_WORD_LEN` words of the following stride so that
/// consecutive chunks share an overlap region. Empty input yields an
/// empty vec.
pub fn chunk_text(text: &str) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let total_words = words.len();

    let words_per_chunk = CHUNK_SIZE / AVG_WORD_LEN;
    let overlap_words = OVERLAP_SIZE / AVG_WORD_LEN;

    let mut chunks = Vec::new();
    let mut chunk_index = 0;

    let mut i = 0;
    while i < total_words {
        let take = (words_per_chunk + overlap_words).min(total_words - i);
        let chunk_words = &words[i..i + take];
        if !chunk_words.is_empty() {
            chunks.push(Chunk {
                text: chunk_words.join(" "),
                index: chunk_index,
                start_position: i,
                end_position: (i + words_per_chunk).min(total_words),
                page: None,
            });
            chunk_index += 1;
        }
        i += words_per_chunk;
    }

    chunks
}
