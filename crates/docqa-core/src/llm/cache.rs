//! Embedding cache keyed by content hash

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Default cache capacity in entries
pub const CACHE_SIZE: usize = 1000;

struct CacheInner {
    entries: HashMap<String, Vec<f32>>,
    /// Insertion order of keys; the front is the next eviction victim
    order: VecDeque<String>,
}

/// Capacity-bounded FIFO cache mapping text content hashes to embeddings.
///
/// Eviction is by insertion order, not access recency: inserting a new key
/// at capacity evicts the oldest-inserted key. Re-inserting an existing key
/// overwrites the value without changing its place in the eviction order.
pub struct EmbeddingCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

impl EmbeddingCache {
    /// Create a cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(CACHE_SIZE)
    }

    /// Create a cache holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
        }
    }

    fn cache_key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Look up the embedding for the exact text, if cached
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let key = Self::cache_key(text);
        let inner = self.inner.lock().expect("embedding cache poisoned");
        inner.entries.get(&key).cloned()
    }

    /// Insert or overwrite the embedding for a text
    pub fn put(&self, text: &str, embedding: Vec<f32>) {
        let key = Self::cache_key(text);
        let mut inner = self.inner.lock().expect("embedding cache poisoned");
        if !inner.entries.contains_key(&key) {
            if inner.order.len() >= self.capacity {
                if let Some(old_key) = inner.order.pop_front() {
                    inner.entries.remove(&old_key);
                }
            }
            inner.order.push_back(key.clone());
        }
        inner.entries.insert(key, embedding);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.inner.lock().expect("embedding cache poisoned").entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new()
    }
}
