//! The store state container.
//!
//! [`StoreStateContainer`] owns a store's inventory and the customer's order
//! and mediates between the persistence adapters and the view layer.
//!
//! # State
//!
//! Both mappings are held behind an [`Arc`] and are never patched in place:
//! every mutation builds a new mapping and installs a new `Arc`, so a renderer
//! can detect changes with [`Arc::ptr_eq`].
//!
//! # Lifecycle
//!
//! ```text
//! new ──> initialize ──> (intents | process_sync_events)* ──> dispose
//! ```
//!
//! - `initialize` binds the inventory to `<storeId>/fishes` and restores the
//!   order from the local cache.
//! - Inventory intents are pushed to the remote; the remote echoes them back
//!   as snapshots, and the last snapshot always wins.
//! - Every order change is written through to the local cache.
//! - `dispose` (or drop) releases the remote binding.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use catch_of_the_day_core::{Fish, FishStatus, Price, StoreId};
//! use catch_of_the_day_storefront::cache::MemoryCache;
//! use catch_of_the_day_storefront::state::StoreStateContainer;
//! use catch_of_the_day_storefront::sync::MemoryRemote;
//!
//! let mut store = StoreStateContainer::new(
//!     StoreId::parse("shop-1").unwrap(),
//!     Arc::new(MemoryRemote::new()),
//!     Arc::new(MemoryCache::new()),
//! );
//! store.initialize();
//!
//! let key = store.add_fish(Fish::new("Trout", Price::from_cents(1099), FishStatus::Available));
//! store.add_to_order(key.clone()).unwrap();
//! assert_eq!(store.order().get(&key), Some(&1));
//! ```

use std::sync::Arc;

use catch_of_the_day_core::{Fish, FishKey, Inventory, Order, StoreId};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, instrument, warn};

use crate::cache::LocalCache;
use crate::error::Result;
use crate::keys::{KeyGenerator, MonotonicKeys};
use crate::samples::sample_fishes;
use crate::sync::{RemoteStore, SubscriptionHandle, SyncEvent, SyncReceiver, SyncStatus};
use crate::view::StoreView;

/// Owner of one store's inventory and order.
pub struct StoreStateContainer {
    store_id: StoreId,
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn LocalCache>,
    keys: Box<dyn KeyGenerator>,
    fishes: Arc<Inventory>,
    order: Arc<Order>,
    sync: SyncStatus,
    subscription: Option<SubscriptionHandle>,
    events: Option<SyncReceiver>,
}

impl StoreStateContainer {
    /// Create a container for `store_id`. Nothing is bound or read until
    /// [`initialize`](Self::initialize).
    #[must_use]
    pub fn new(
        store_id: StoreId,
        remote: Arc<dyn RemoteStore>,
        cache: Arc<dyn LocalCache>,
    ) -> Self {
        Self {
            store_id,
            remote,
            cache,
            keys: Box::new(MonotonicKeys::new()),
            fishes: Arc::new(Inventory::new()),
            order: Arc::new(Order::new()),
            sync: SyncStatus::Detached,
            subscription: None,
            events: None,
        }
    }

    /// Replace the key generator used by [`add_fish`](Self::add_fish).
    #[must_use]
    pub fn with_key_generator(mut self, keys: Box<dyn KeyGenerator>) -> Self {
        self.keys = keys;
        self
    }

    /// The store this container serves.
    #[must_use]
    pub const fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    /// Current inventory.
    #[must_use]
    pub const fn fishes(&self) -> &Arc<Inventory> {
        &self.fishes
    }

    /// Current order.
    #[must_use]
    pub const fn order(&self) -> &Arc<Order> {
        &self.order
    }

    /// Health of the remote binding.
    #[must_use]
    pub const fn sync_status(&self) -> &SyncStatus {
        &self.sync
    }

    /// Whether the container currently holds a remote binding.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.subscription.is_some()
    }

    /// View-model of the current state.
    #[must_use]
    pub fn view(&self) -> StoreView {
        StoreView::build(&self.store_id, &self.fishes, &self.order, &self.sync)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bind the inventory to the remote and restore the cached order.
    ///
    /// A failed binding does not fail initialization: the container keeps
    /// working locally and reports [`SyncStatus::Unavailable`]. Calling this
    /// again while bound only re-reads the order.
    #[instrument(skip(self), fields(store = %self.store_id))]
    pub fn initialize(&mut self) {
        if self.subscription.is_none() {
            let (tx, rx) = mpsc::unbounded_channel();
            match self.remote.bind(&self.store_id.remote_path(), tx) {
                Ok(handle) => {
                    info!(%handle, "Inventory bound to remote");
                    self.subscription = Some(handle);
                    self.events = Some(rx);
                    self.sync = SyncStatus::Connecting;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to bind inventory; continuing offline");
                    self.sync = SyncStatus::Unavailable(e.to_string());
                }
            }
        }

        self.order = Arc::new(self.restore_order());
        debug!(lines = self.order.len(), "Order restored");
    }

    /// Release the remote binding. Safe to call more than once.
    #[instrument(skip(self), fields(store = %self.store_id))]
    pub fn dispose(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.remote.unbind(handle);
            info!(%handle, "Inventory unbound from remote");
        }
        self.events = None;
        self.sync = SyncStatus::Detached;
    }

    /// Read the order from the local cache, falling back to an empty order
    /// when nothing is cached or the value does not parse.
    fn restore_order(&self) -> Order {
        let key = self.store_id.order_cache_key();
        let Some(raw) = self.cache.get(&key) else {
            debug!(key = %key, "No cached order");
            return Order::new();
        };

        match serde_json::from_str::<Option<Order>>(&raw) {
            Ok(order) => {
                let mut order = order.unwrap_or_default();
                order.retain(|_, quantity| *quantity > 0);
                order
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cached order is unreadable; starting empty");
                Order::new()
            }
        }
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Add a fish to the inventory under a freshly generated key.
    #[instrument(skip(self, fish), fields(store = %self.store_id, name = %fish.name))]
    pub fn add_fish(&mut self, fish: Fish) -> FishKey {
        let mut key = self.keys.next_key();
        while self.fishes.contains_key(&key) {
            key = self.keys.next_key();
        }

        let mut fishes = Inventory::clone(&self.fishes);
        fishes.insert(key.clone(), fish);
        self.fishes = Arc::new(fishes);
        debug!(%key, "Fish added");

        self.on_inventory_changed();
        key
    }

    /// Replace the whole inventory with the demo dataset.
    #[instrument(skip(self), fields(store = %self.store_id))]
    pub fn load_samples(&mut self) {
        self.fishes = Arc::new(sample_fishes());
        debug!(fishes = self.fishes.len(), "Sample fishes loaded");

        self.on_inventory_changed();
    }

    /// Add one unit of `key` to the order and return the new quantity.
    ///
    /// The key is not checked against the inventory. The order is always
    /// updated in memory; an error means only the cache write-through failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be serialized or cached.
    #[instrument(skip(self, key), fields(store = %self.store_id))]
    pub fn add_to_order(&mut self, key: impl Into<FishKey>) -> Result<u32> {
        let key = key.into();
        let mut order = Order::clone(&self.order);
        let quantity = order
            .get(&key)
            .map_or(1, |quantity| quantity.saturating_add(1));
        order.insert(key.clone(), quantity);
        self.order = Arc::new(order);
        debug!(%key, quantity, "Order updated");

        self.on_order_changed()?;
        Ok(quantity)
    }

    // =========================================================================
    // Change hooks
    // =========================================================================

    /// Push the inventory to the remote.
    fn on_inventory_changed(&mut self) {
        if self.subscription.is_none() {
            debug!("Not bound; inventory kept locally");
            return;
        }

        if let Err(e) = self
            .remote
            .push(&self.store_id.remote_path(), &self.fishes)
        {
            warn!(error = %e, "Failed to push inventory");
            self.sync = SyncStatus::Unavailable(e.to_string());
        }
    }

    /// Write the full order through to the local cache.
    fn on_order_changed(&self) -> Result<()> {
        let value = serde_json::to_string(self.order.as_ref())?;
        self.cache.set(&self.store_id.order_cache_key(), value)?;
        Ok(())
    }

    // =========================================================================
    // Remote notifications
    // =========================================================================

    /// Apply every queued remote notification, in arrival order.
    ///
    /// Returns the number of notifications applied.
    pub fn process_sync_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(events) = self.events.as_mut() else {
                break;
            };

            match events.try_recv() {
                Ok(event) => {
                    self.apply_sync_event(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.on_sync_closed();
                    break;
                }
            }
        }
        applied
    }

    /// Wait for the next remote notification and apply it.
    ///
    /// Returns `false` once no more notifications can arrive (not bound, or
    /// the remote dropped the binding).
    pub async fn next_sync_event(&mut self) -> bool {
        let Some(events) = self.events.as_mut() else {
            return false;
        };

        if let Some(event) = events.recv().await {
            self.apply_sync_event(event);
            true
        } else {
            self.on_sync_closed();
            false
        }
    }

    fn apply_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Snapshot(fishes) => {
                debug!(store = %self.store_id, fishes = fishes.len(), "Remote snapshot applied");
                self.fishes = Arc::new(fishes);
                self.sync = SyncStatus::Live;
            }
            SyncEvent::Unavailable(reason) => {
                warn!(store = %self.store_id, reason = %reason, "Remote sync unavailable");
                self.sync = SyncStatus::Unavailable(reason);
            }
        }
    }

    fn on_sync_closed(&mut self) {
        warn!(store = %self.store_id, "Remote binding closed");
        self.events = None;
        self.sync = SyncStatus::Unavailable("remote binding closed".to_string());
    }
}

impl Drop for StoreStateContainer {
    fn drop(&mut self) {
        self.dispose();
    }
}
