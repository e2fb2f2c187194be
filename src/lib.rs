//! Cacher - an embeddable in-memory key/value cache
//!
//! Holds at most a fixed number of entries and evicts the least recently
//! used one when a new key is inserted into a full cache. Keys compare
//! case-insensitively, values are opaque, and hosts can subscribe to
//! eviction notifications.
//!
//! # Example
//! ```
//! use cacher::Cache;
//!
//! let cache: Cache<String> = Cache::new(2).unwrap();
//! cache.on_evicted(|key, _value| println!("evicted {key}"));
//!
//! cache.add("a", "alpha".to_string()).unwrap();
//! cache.add("b", "beta".to_string()).unwrap();
//! cache.add("c", "gamma".to_string()).unwrap(); // evicts "a"
//!
//! assert!(cache.get("a").is_err());
//! assert_eq!(*cache.get("B").unwrap(), "beta");
//! ```

pub mod cache;
pub mod error;

pub use cache::{Cache, CacheStats};
pub use error::{CacheError, Result};
