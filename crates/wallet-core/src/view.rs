//! Request sequencing and boundary caching for derived views
//!
//! - `RefreshSignal` is an epoch bumped after every successful write. Views
//!   compare epochs to know when their inputs changed.
//! - `ViewCache` memoises one derived value per view, keyed on the filter and
//!   the epoch. Each load takes a `RequestToken`; a response is kept only if
//!   no newer load started meanwhile, so a slow stale response can never
//!   overwrite a fresh one.
//! - `Loaded` and `load_or` apply the read fallback policy: log the failure,
//!   show an empty result and a message.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, error};

use crate::error::Error;

/// Monotonic change counter shared between writers and views
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal {
    epoch: Arc<AtomicU64>,
}

impl RefreshSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Record a write; returns the new epoch
    pub fn bump(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Issued by `ViewCache::begin` for each load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

struct Entry<K, V> {
    key: K,
    epoch: u64,
    value: V,
}

struct CacheState<K, V> {
    issued: u64,
    entry: Option<Entry<K, V>>,
}

/// Single-slot cache for one derived view
pub struct ViewCache<K, V> {
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> Default for ViewCache<K, V> {
    fn default() -> Self {
        Self {
            state: Mutex::new(CacheState {
                issued: 0,
                entry: None,
            }),
        }
    }
}

impl<K: PartialEq, V: Clone> ViewCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached value for this filter key, if computed at this epoch
    pub fn get(&self, key: &K, epoch: u64) -> Option<V> {
        let state = self.lock();
        state
            .entry
            .as_ref()
            .filter(|e| e.epoch == epoch && e.key == *key)
            .map(|e| e.value.clone())
    }

    /// Start a load. Any token issued earlier becomes stale.
    pub fn begin(&self) -> RequestToken {
        let mut state = self.lock();
        state.issued += 1;
        RequestToken(state.issued)
    }

    /// Store a load result. Returns false (and drops the value) when a newer
    /// load has started since `token` was issued.
    pub fn commit(&self, token: RequestToken, key: K, epoch: u64, value: V) -> bool {
        let mut state = self.lock();
        if token.0 != state.issued {
            debug!(token = token.0, latest = state.issued, "Discarding stale view response");
            return false;
        }
        state.entry = Some(Entry { key, epoch, value });
        true
    }

    pub fn invalidate(&self) {
        self.lock().entry = None;
    }
}

/// Outcome of a read with the fallback applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loaded<T> {
    pub data: T,
    /// User-facing message when the read failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Loaded<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Unwrap a read, or log the error and fall back to `fallback` plus `message`
pub fn load_or<T>(result: Result<T, Error>, fallback: T, message: &str) -> Loaded<T> {
    match result {
        Ok(data) => Loaded::ok(data),
        Err(e) => {
            error!(error = %e, "{}", message);
            Loaded {
                data: fallback,
                error: Some(message.to_string()),
            }
        }
    }
}
