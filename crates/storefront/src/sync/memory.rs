//! Process-local remote store.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use catch_of_the_day_core::Inventory;
use tracing::{debug, info};

use super::{RemoteStore, SubscriptionHandle, SyncError, SyncEvent, SyncSender};

/// In-memory [`RemoteStore`] shared by every container holding a clone.
///
/// Behaves like the realtime database the app normally binds to: each push
/// replaces the value at its path and fans a snapshot out to every binding on
/// that path, the pusher included. It can be taken offline to exercise the
/// "sync unavailable" paths.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<MemoryRemoteInner>>,
}

struct MemoryRemoteInner {
    online: bool,
    values: HashMap<String, Inventory>,
    subscribers: HashMap<u64, Subscriber>,
    next_id: u64,
}

struct Subscriber {
    path: String,
    sink: SyncSender,
}

impl Default for MemoryRemoteInner {
    fn default() -> Self {
        Self {
            online: true,
            values: HashMap::new(),
            subscribers: HashMap::new(),
            next_id: 1,
        }
    }
}

impl MemoryRemoteInner {
    /// Send a snapshot of `path` to its subscribers, dropping closed sinks.
    fn broadcast(&mut self, path: &str) {
        let value = self.values.get(path).cloned().unwrap_or_default();
        self.subscribers.retain(|_, sub| {
            sub.path != path || sub.sink.send(SyncEvent::Snapshot(value.clone())).is_ok()
        });
    }
}

impl MemoryRemote {
    /// Create an empty, online store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryRemoteInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the store on- or offline.
    ///
    /// Going offline tells every binding the remote is unavailable; coming
    /// back online resends the current value to every binding.
    pub fn set_online(&self, online: bool) {
        let mut inner = self.lock();
        if inner.online == online {
            return;
        }
        inner.online = online;
        info!(online, "Memory remote connectivity changed");

        if online {
            let paths: BTreeSet<String> = inner
                .subscribers
                .values()
                .map(|sub| sub.path.clone())
                .collect();
            for path in paths {
                inner.broadcast(&path);
            }
        } else {
            inner.subscribers.retain(|_, sub| {
                sub.sink
                    .send(SyncEvent::Unavailable("remote store is offline".to_string()))
                    .is_ok()
            });
        }
    }

    /// Current value stored at `path`.
    #[must_use]
    pub fn value(&self, path: &str) -> Option<Inventory> {
        self.lock().values.get(path).cloned()
    }

    /// Number of live bindings on `path`.
    #[must_use]
    pub fn subscriber_count(&self, path: &str) -> usize {
        self.lock()
            .subscribers
            .values()
            .filter(|sub| sub.path == path && !sub.sink.is_closed())
            .count()
    }
}

impl RemoteStore for MemoryRemote {
    fn bind(&self, path: &str, sink: SyncSender) -> Result<SubscriptionHandle, SyncError> {
        let mut inner = self.lock();
        if !inner.online {
            return Err(SyncError::Offline);
        }

        let value = inner.values.get(path).cloned().unwrap_or_default();
        // A sink that is already closed has nobody to deliver to; the binding
        // is still handed out and will be pruned on the next broadcast.
        let _ = sink.send(SyncEvent::Snapshot(value));

        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(
            id,
            Subscriber {
                path: path.to_string(),
                sink,
            },
        );
        debug!(path, id, "Bound to memory remote");

        Ok(SubscriptionHandle::new(id))
    }

    fn unbind(&self, handle: SubscriptionHandle) {
        if self.lock().subscribers.remove(&handle.id()).is_some() {
            debug!(%handle, "Unbound from memory remote");
        }
    }

    fn push(&self, path: &str, inventory: &Inventory) -> Result<(), SyncError> {
        let mut inner = self.lock();
        if !inner.online {
            return Err(SyncError::Offline);
        }

        inner.values.insert(path.to_string(), inventory.clone());
        inner.broadcast(path);
        debug!(path, fishes = inventory.len(), "Pushed to memory remote");
        Ok(())
    }
}
