//! Client-side key/value cache for orders.
//!
//! Orders never leave the customer's device: each store's order is kept as a
//! JSON string under `order-<storeId>`. Reads and writes are synchronous.
//!
//! # Adapters
//!
//! - [`MemoryCache`] - in-memory, backed by `moka`
//! - [`FileCache`] - one JSON file per key in a directory, survives restarts

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use thiserror::Error;

/// Errors that can occur when writing to a local cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed.
    #[error("cache I/O error for {key}: {source}")]
    Io {
        /// Key being written.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Port to the client's local key/value storage.
pub trait LocalCache: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be stored.
    fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
}
