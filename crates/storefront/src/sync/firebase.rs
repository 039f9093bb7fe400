//! Realtime database REST adapter.
//!
//! Values are read and written through the database's REST interface:
//! `GET <base>/<path>.json` returns the stored inventory (`null` when nothing
//! is stored yet) and `PUT <base>/<path>.json` replaces it. Bindings poll the
//! value on a fixed interval and emit a snapshot whenever it changes.
//!
//! Each segment of `<path>` is percent-encoded, so a store id can never reach
//! outside its own node. Pushes go through a single queue and are sent one at
//! a time, in the order they were issued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use catch_of_the_day_core::Inventory;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{RemoteStore, SubscriptionHandle, SyncError, SyncEvent, SyncSender};

/// [`RemoteStore`] backed by a realtime database REST endpoint.
///
/// Cheaply cloneable; clones share bindings.
#[derive(Clone)]
pub struct FirebaseRemote {
    inner: Arc<FirebaseRemoteInner>,
}

struct FirebaseRemoteInner {
    client: reqwest::Client,
    base_url: Url,
    poll_interval: Duration,
    runtime: Handle,
    pollers: Mutex<HashMap<u64, JoinHandle<()>>>,
    next_id: AtomicU64,
    writes: mpsc::UnboundedSender<PendingPush>,
}

/// A `PUT` waiting in the push queue.
struct PendingPush {
    url: Url,
    body: serde_json::Value,
    fishes: usize,
}

impl Drop for FirebaseRemoteInner {
    fn drop(&mut self) {
        let pollers = self.pollers.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in pollers.drain() {
            task.abort();
        }
    }
}

impl FirebaseRemote {
    /// Create a client for the database at `base_url`.
    ///
    /// Must be called from within a Tokio runtime; the push writer and the
    /// pollers are spawned onto it.
    ///
    /// # Errors
    ///
    /// Returns an error if no runtime is running or `base_url` cannot carry a
    /// path (e.g. `mailto:`).
    pub fn new(base_url: &Url, poll_interval: Duration) -> Result<Self, SyncError> {
        let runtime = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::BaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::new();
        let (writes, queue) = mpsc::unbounded_channel();
        runtime.spawn(write_pushes(client.clone(), queue));

        Ok(Self {
            inner: Arc::new(FirebaseRemoteInner {
                client,
                base_url: base_url.clone(),
                poll_interval,
                runtime,
                pollers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                writes,
            }),
        })
    }

    /// REST endpoint for a `/`-separated database path.
    ///
    /// Every segment is percent-encoded and appended to the base URL's path;
    /// `.json` is added to the last one.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn endpoint(&self, path: &str) -> Result<Url, SyncError> {
        let base = &self.inner.base_url;
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| SyncError::BaseUrl(base.to_string()))?;
            segments.pop_if_empty();

            let mut parts = path.split('/').peekable();
            while let Some(part) = parts.next() {
                if parts.peek().is_some() {
                    segments.push(part);
                } else {
                    segments.push(&format!("{part}.json"));
                }
            }
        }
        Ok(url)
    }

    /// Number of running pollers.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.inner
            .pollers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|task| !task.is_finished())
            .count()
    }
}

/// Read the inventory stored at `url`.
async fn fetch(client: &reqwest::Client, url: &Url) -> Result<Inventory, SyncError> {
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let value: Option<Inventory> = response.json().await?;
    Ok(value.unwrap_or_default())
}

/// Send queued pushes one at a time until every sender is gone.
async fn write_pushes(client: reqwest::Client, mut queue: mpsc::UnboundedReceiver<PendingPush>) {
    while let Some(PendingPush { url, body, fishes }) = queue.recv().await {
        let result = client
            .put(url.clone())
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match result {
            Ok(_) => debug!(%url, fishes, "Pushed inventory"),
            Err(e) => warn!(%url, error = %e, "Failed to push inventory"),
        }
    }

    debug!("Push writer stopped");
}

/// Poll `url` until the sink is closed, emitting a snapshot per change and a
/// single `Unavailable` per outage.
#[instrument(skip(client, sink), fields(url = %url))]
async fn poll(client: reqwest::Client, url: Url, interval: Duration, sink: SyncSender) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last: Option<Inventory> = None;
    let mut reachable = true;

    loop {
        ticker.tick().await;
        if sink.is_closed() {
            break;
        }

        let event = match fetch(&client, &url).await {
            Ok(inventory) => {
                reachable = true;
                if last.as_ref() == Some(&inventory) {
                    continue;
                }
                last = Some(inventory.clone());
                SyncEvent::Snapshot(inventory)
            }
            Err(e) => {
                if !reachable {
                    continue;
                }
                warn!(error = %e, "Remote inventory unreachable");
                reachable = false;
                // Force a fresh snapshot once the remote answers again.
                last = None;
                SyncEvent::Unavailable(e.to_string())
            }
        };

        if sink.send(event).is_err() {
            break;
        }
    }

    debug!("Poller stopped");
}

impl RemoteStore for FirebaseRemote {
    fn bind(&self, path: &str, sink: SyncSender) -> Result<SubscriptionHandle, SyncError> {
        let url = self.endpoint(path)?;
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let task = self.inner.runtime.spawn(poll(
            self.inner.client.clone(),
            url,
            self.inner.poll_interval,
            sink,
        ));
        self.inner
            .pollers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, task);

        info!(path, id, "Bound to remote inventory");
        Ok(SubscriptionHandle::new(id))
    }

    fn unbind(&self, handle: SubscriptionHandle) {
        let task = self
            .inner
            .pollers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.id());

        if let Some(task) = task {
            task.abort();
            info!(%handle, "Unbound from remote inventory");
        }
    }

    fn push(&self, path: &str, inventory: &Inventory) -> Result<(), SyncError> {
        let pending = PendingPush {
            url: self.endpoint(path)?,
            body: serde_json::to_value(inventory)?,
            fishes: inventory.len(),
        };

        self.inner
            .writes
            .send(pending)
            .map_err(|_| SyncError::WriterStopped)
    }
}
