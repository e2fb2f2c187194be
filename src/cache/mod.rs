//! Cache Module
//!
//! Provides in-memory caching with a bounded entry count and LRU eviction.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{Cache, EvictionSubscriber};
