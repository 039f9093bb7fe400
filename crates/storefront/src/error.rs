//! Unified error handling for the storefront library.
//!
//! Each adapter has its own error type; [`StoreError`] wraps them for callers
//! that drive a store session end to end.

use thiserror::Error;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::sync::SyncError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Local order cache write failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Remote inventory sync failed.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// State could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::from(SyncError::Offline);
        assert_eq!(err.to_string(), "Sync error: remote store is offline");

        let err = StoreError::from(ConfigError::InvalidEnvVar(
            "COTD_SYNC_POLL_MS".to_string(),
            "invalid digit".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Config error: Invalid environment variable COTD_SYNC_POLL_MS: invalid digit"
        );
    }

    #[test]
    fn test_cache_error_source() {
        use std::error::Error as _;

        let err = StoreError::from(CacheError::Io {
            key: "order-shop-1".to_string(),
            source: std::io::Error::other("disk full"),
        });
        assert!(err.to_string().contains("order-shop-1"));
        assert!(err.source().is_some());
    }
}
