//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache
    #[error("An item with key '{0}' was not found in the cache")]
    NotFound(String),

    /// Key already present (strict add only)
    #[error("An item with key '{0}' already exists in the cache")]
    AlreadyExists(String),

    /// Capacity threshold rejected at construction
    #[error("Invalid capacity threshold {0}: must be at least 1")]
    InvalidCapacity(usize),
}

impl CacheError {
    // == Key Accessor ==
    /// Returns the key that caused the error, if the variant carries one.
    pub fn key(&self) -> Option<&str> {
        match self {
            CacheError::NotFound(key) | CacheError::AlreadyExists(key) => Some(key),
            CacheError::InvalidCapacity(_) => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_key() {
        let err = CacheError::NotFound("session:42".to_string());
        assert!(err.to_string().contains("session:42"));

        let err = CacheError::AlreadyExists("Foo".to_string());
        assert!(err.to_string().contains("Foo"));
    }

    #[test]
    fn test_error_key_accessor() {
        assert_eq!(CacheError::NotFound("a".to_string()).key(), Some("a"));
        assert_eq!(CacheError::AlreadyExists("b".to_string()).key(), Some("b"));
        assert_eq!(CacheError::InvalidCapacity(0).key(), None);
    }
}
