//! Adapters shared by every store opened in a process.

use std::sync::Arc;

use catch_of_the_day_core::StoreId;
use tracing::info;

use crate::cache::{FileCache, LocalCache};
use crate::config::StorefrontConfig;
use crate::state::StoreStateContainer;
use crate::sync::{FirebaseRemote, MemoryRemote, RemoteStore, SyncError};

/// Configured remote and cache, ready to open stores.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: StorefrontConfig,
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn LocalCache>,
}

impl Session {
    /// Build the adapters described by `config`.
    ///
    /// Uses the realtime database when `COTD_FIREBASE_URL` is configured and
    /// an in-process remote otherwise; orders are cached under the configured
    /// cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote adapter cannot be created (for the
    /// realtime database, when called outside a Tokio runtime).
    pub fn new(config: StorefrontConfig) -> Result<Self, SyncError> {
        let remote: Arc<dyn RemoteStore> = match &config.remote.firebase_url {
            Some(url) => {
                info!(%url, "Using realtime database remote");
                Arc::new(FirebaseRemote::new(url, config.remote.poll_interval)?)
            }
            None => {
                info!("No remote configured; inventory is kept in memory");
                Arc::new(MemoryRemote::new())
            }
        };
        let cache: Arc<dyn LocalCache> = Arc::new(FileCache::new(&config.cache_dir));

        Ok(Self::with_adapters(config, remote, cache))
    }

    /// Use explicit adapters instead of the configured ones.
    #[must_use]
    pub fn with_adapters(
        config: StorefrontConfig,
        remote: Arc<dyn RemoteStore>,
        cache: Arc<dyn LocalCache>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                remote,
                cache,
            }),
        }
    }

    /// Open `store_id`: build its container and initialize it.
    #[must_use]
    pub fn open(&self, store_id: StoreId) -> StoreStateContainer {
        let mut store = StoreStateContainer::new(
            store_id,
            Arc::clone(&self.inner.remote),
            Arc::clone(&self.inner.cache),
        )
        .with_key_generator(self.inner.config.key_strategy.generator());
        store.initialize();
        store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::keys::KeyStrategy;
    use crate::sync::SyncStatus;

    fn config(vars: &[(&str, &str)]) -> StorefrontConfig {
        StorefrontConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_memory_remote_without_url() {
        let session = Session::new(config(&[])).unwrap();
        let store = session.open(StoreId::parse("shop-1").unwrap());
        assert!(store.is_bound());
        assert_eq!(store.sync_status(), &SyncStatus::Connecting);
    }

    #[test]
    fn test_firebase_remote_needs_runtime() {
        let result = Session::new(config(&[("COTD_FIREBASE_URL", "https://db.example.com")]));
        assert!(matches!(result, Err(SyncError::NoRuntime)));
    }

    #[test]
    fn test_open_uses_configured_key_strategy() {
        let config = config(&[("COTD_KEY_STRATEGY", "uuid")]);
        assert_eq!(config.key_strategy, KeyStrategy::Uuid);

        let session = Session::with_adapters(
            config,
            Arc::new(MemoryRemote::new()),
            Arc::new(MemoryCache::new()),
        );
        let mut store = session.open(StoreId::parse("shop-1").unwrap());
        let key = store.add_fish(catch_of_the_day_core::Fish::new(
            "Trout",
            catch_of_the_day_core::Price::from_cents(1099),
            catch_of_the_day_core::FishStatus::Available,
        ));
        // "fish-" + 36-character UUID
        assert_eq!(key.as_str().len(), 41);
    }

    #[test]
    fn test_stores_share_remote() {
        let session = Session::with_adapters(
            config(&[]),
            Arc::new(MemoryRemote::new()),
            Arc::new(MemoryCache::new()),
        );
        let mut owner = session.open(StoreId::parse("shop-1").unwrap());
        let mut customer = session.open(StoreId::parse("shop-1").unwrap());
        owner.process_sync_events();
        customer.process_sync_events();

        owner.load_samples();
        customer.process_sync_events();
        assert_eq!(customer.fishes().len(), 9);
    }
}
