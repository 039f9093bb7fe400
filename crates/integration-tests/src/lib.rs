//! Integration tests for Catch of the Day.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catch-of-the-day-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `store_state` - container lifecycle, intents and order cache
//! - `remote_sync` - containers sharing an in-process remote
//! - `firebase_sync` - REST adapter against [`FakeDatabase`]
//!
//! Everything runs in-process; no external services are needed.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use catch_of_the_day_core::{Fish, FishStatus, Price, StoreId};
use catch_of_the_day_storefront::StoreStateContainer;
use catch_of_the_day_storefront::cache::MemoryCache;
use catch_of_the_day_storefront::keys::{KeyGenerator, MonotonicKeys};
use catch_of_the_day_storefront::sync::MemoryRemote;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

// ============================================================================
// Fixtures
// ============================================================================

/// Parse a store id known to be valid.
///
/// # Panics
///
/// Panics if `id` is not a valid store id.
#[must_use]
pub fn store_id(id: &str) -> StoreId {
    StoreId::parse(id).expect("valid store id")
}

/// The fish used throughout the scenarios.
#[must_use]
pub fn trout() -> Fish {
    Fish::new("Trout", Price::from_cents(1099), FishStatus::Available)
}

/// Key generator whose clock never moves.
#[must_use]
pub fn frozen_keys(millis: i64) -> Box<dyn KeyGenerator> {
    Box::new(MonotonicKeys::with_clock(move || millis))
}

/// Open an initialized store on shared in-process adapters, with the initial
/// snapshot already applied.
#[must_use]
pub fn open_store(id: &str, remote: &MemoryRemote, cache: &MemoryCache) -> StoreStateContainer {
    let mut store = StoreStateContainer::new(
        store_id(id),
        Arc::new(remote.clone()),
        Arc::new(cache.clone()),
    );
    store.initialize();
    store.process_sync_events();
    store
}

// ============================================================================
// Fake realtime database
// ============================================================================

/// Realtime database stand-in serving `GET`/`PUT /<path>.json`.
///
/// Stops when dropped.
pub struct FakeDatabase {
    url: Url,
    state: Arc<DatabaseState>,
    server: JoinHandle<()>,
}

#[derive(Default)]
struct DatabaseState {
    values: Mutex<HashMap<String, Value>>,
    offline: AtomicBool,
    put_delays: Mutex<VecDeque<Duration>>,
}

impl DatabaseState {
    fn values(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_online(&self) -> Result<(), StatusCode> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StatusCode::SERVICE_UNAVAILABLE)
        } else {
            Ok(())
        }
    }
}

impl FakeDatabase {
    /// Serve on an ephemeral localhost port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let url = Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)?;

        let state = Arc::new(DatabaseState::default());
        let app = Router::new()
            .route("/{*path}", get(read_node).put(write_node))
            .with_state(Arc::clone(&state));

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("fake database server failed");
        });

        Ok(Self { url, state, server })
    }

    /// Base URL to hand to the REST adapter.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Value stored at `path` (without `.json`), if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Value> {
        self.state.values().get(path).cloned()
    }

    /// Store `value` at `path`, as another client would.
    pub fn set(&self, path: &str, value: Value) {
        self.state.values().insert(path.to_string(), value);
    }

    /// Answer every request with `503` while offline.
    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    /// Hold the next not-yet-delayed `PUT` for `delay` before applying it.
    pub fn delay_next_put(&self, delay: Duration) {
        self.state
            .put_delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(delay);
    }
}

impl Drop for FakeDatabase {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Database node addressed by a request path.
fn node(path: &str) -> &str {
    path.strip_suffix(".json").unwrap_or(path)
}

async fn read_node(
    State(db): State<Arc<DatabaseState>>,
    Path(path): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    db.ensure_online()?;
    let value = db.values().get(node(&path)).cloned().unwrap_or(Value::Null);
    Ok(Json(value))
}

async fn write_node(
    State(db): State<Arc<DatabaseState>>,
    Path(path): Path<String>,
    Json(value): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let delay = db
        .put_delays
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    db.ensure_online()?;
    db.values().insert(node(&path).to_string(), value.clone());
    Ok(Json(value))
}
