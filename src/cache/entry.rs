//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with recency metadata.

use std::sync::Arc;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// Represents a single cache entry with its value and recency metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The key exactly as the caller first supplied it (original casing)
    pub key: String,
    /// Handle to the stored value
    pub value: Arc<V>,
    /// Last read or write time (UTC)
    pub last_accessed: DateTime<Utc>,
    /// Engine-global use sequence, bumped on every touch.
    /// Breaks ties between entries sharing an identical timestamp:
    /// the smaller sequence was used longer ago.
    pub use_seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry, stamped as used right now.
    ///
    /// # Arguments
    /// * `key` - The key as supplied by the caller
    /// * `value` - The value to store
    /// * `use_seq` - The engine's current use sequence number
    pub fn new(key: String, value: V, use_seq: u64) -> Self {
        Self {
            key,
            value: Arc::new(value),
            last_accessed: Utc::now(),
            use_seq,
        }
    }

    // == Touch ==
    /// Refreshes the entry's recency to the current time.
    ///
    /// `last_accessed` never moves backward, even if the wall clock does:
    /// a stale `now` is ignored and only the sequence number advances.
    pub fn touch(&mut self, use_seq: u64) {
        let now = Utc::now();
        if now > self.last_accessed {
            self.last_accessed = now;
        }
        self.use_seq = use_seq;
    }

    // == Replace Value ==
    /// Swaps in a new value and refreshes recency (upsert path).
    pub fn replace(&mut self, value: V, use_seq: u64) {
        self.value = Arc::new(value);
        self.touch(use_seq);
    }
}
