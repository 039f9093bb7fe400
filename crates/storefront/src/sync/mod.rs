//! Remote inventory sync.
//!
//! # Architecture
//!
//! A store's inventory lives remotely under `<storeId>/fishes` and is shared by
//! every client viewing that store. The [`RemoteStore`] port binds a container
//! to that path; the adapter then delivers every remote value as a full
//! [`SyncEvent::Snapshot`] into the container's queue. Local changes go the
//! other way through [`RemoteStore::push`]. There is no diffing and no merge:
//! the last write wins.
//!
//! # Adapters
//!
//! - [`MemoryRemote`] - process-local store, shared by every container holding
//!   the same handle. Used by tests and by the shell when no remote is set up.
//! - [`FirebaseRemote`] - realtime database REST endpoint, polled for changes.

mod firebase;
mod memory;

pub use firebase::FirebaseRemote;
pub use memory::MemoryRemote;

use catch_of_the_day_core::Inventory;
use thiserror::Error;
use tokio::sync::mpsc;

/// Notification delivered by a remote binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The complete remote inventory. Replaces local state wholesale.
    Snapshot(Inventory),
    /// The remote stopped answering. Carries a human-readable reason.
    Unavailable(String),
}

/// Health of a container's remote binding, as shown to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// Not bound (before `initialize` or after `dispose`).
    #[default]
    Detached,
    /// Bound, waiting for the first snapshot.
    Connecting,
    /// Receiving snapshots.
    Live,
    /// Binding failed or the remote went away.
    Unavailable(String),
}

impl SyncStatus {
    /// Whether the view should warn that inventory may be stale.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detached => write!(f, "detached"),
            Self::Connecting => write!(f, "connecting"),
            Self::Live => write!(f, "live"),
            Self::Unavailable(reason) => write!(f, "sync unavailable: {reason}"),
        }
    }
}

/// Sending half of a container's sync queue.
pub type SyncSender = mpsc::UnboundedSender<SyncEvent>;

/// Receiving half of a container's sync queue.
pub type SyncReceiver = mpsc::UnboundedReceiver<SyncEvent>;

/// Handle returned by [`RemoteStore::bind`], used to release the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    /// Create a handle from an adapter-assigned id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Adapter-assigned id.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Errors that can occur when talking to a remote store.
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP request failed (including non-success status codes).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Inventory could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote base URL cannot carry a path.
    #[error("remote URL cannot hold a database path: {0}")]
    BaseUrl(String),

    /// The remote is not reachable.
    #[error("remote store is offline")]
    Offline,

    /// The adapter needs a Tokio runtime and none is running.
    #[error("no Tokio runtime available")]
    NoRuntime,

    /// The background writer is gone (its runtime shut down).
    #[error("remote writer has stopped")]
    WriterStopped,
}

/// Port to the shared remote inventory store.
///
/// Implementations deliver the current value right after binding and again on
/// every change, from any client, as a [`SyncEvent::Snapshot`].
pub trait RemoteStore: Send + Sync {
    /// Bind `sink` to the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding cannot be established.
    fn bind(&self, path: &str, sink: SyncSender) -> Result<SubscriptionHandle, SyncError>;

    /// Release a binding. Unknown handles are ignored.
    fn unbind(&self, handle: SubscriptionHandle);

    /// Replace the value at `path` with `inventory`.
    ///
    /// Adapters may complete the write in the background; an `Ok` only means
    /// the write was accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be started.
    fn push(&self, path: &str, inventory: &Inventory) -> Result<(), SyncError>;
}
