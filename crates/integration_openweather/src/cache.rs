//! OneCall response cache
//!
//! Coordinate-keyed, TTL-bounded, in-memory store for the OneCall bundle.
//! There is no capacity bound and no background sweep: an expired entry is
//! treated exactly like a missing one and is overwritten by the next fetch.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tracing::debug;

use crate::payload::OneCallPayload;

/// Default OneCall TTL (5 minutes)
pub const DEFAULT_ONE_CALL_TTL: Duration = Duration::from_secs(300);

/// Source of "now" in epoch milliseconds
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let millis = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    captured_at: i64,
    payload: Arc<OneCallPayload>,
}

/// Build the cache key for a coordinate pair
///
/// Uses the exact `f64` rendering, so coordinates differing in any decimal
/// place are distinct keys.
#[must_use]
pub fn cache_key(latitude: f64, longitude: f64) -> String {
    format!("{latitude},{longitude}")
}

/// TTL cache for OneCall bundles
pub struct OneCallCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for OneCallCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneCallCache")
            .field("entries", &self.entries.lock().len())
            .field("ttl_millis", &self.ttl_millis)
            .field("clock", &self.clock)
            .finish()
    }
}

impl OneCallCache {
    /// Create a cache with the given TTL and clock
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            clock,
        }
    }

    /// Create a cache with the default 5 minute TTL on the system clock
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_ONE_CALL_TTL, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.ttl_millis).unwrap_or(u64::MAX))
    }

    /// Fresh payload for the coordinate pair, if any
    pub fn get(&self, latitude: f64, longitude: f64) -> Option<Arc<OneCallPayload>> {
        let key = cache_key(latitude, longitude);
        let now = self.clock.now_millis();
        let entries = self.entries.lock();

        match entries.get(&key) {
            Some(entry) if now.saturating_sub(entry.captured_at) < self.ttl_millis => {
                debug!(key = %key, age_ms = now - entry.captured_at, "OneCall cache hit");
                Some(Arc::clone(&entry.payload))
            },
            Some(_) => {
                debug!(key = %key, "OneCall cache entry expired");
                None
            },
            None => {
                debug!(key = %key, "OneCall cache miss");
                None
            },
        }
    }

    /// Store a payload captured now, replacing any previous entry for the key
    pub fn insert(&self, latitude: f64, longitude: f64, payload: Arc<OneCallPayload>) {
        let key = cache_key(latitude, longitude);
        let captured_at = self.clock.now_millis();
        debug!(key = %key, captured_at, "OneCall cache write");
        self.entries.lock().insert(
            key,
            CacheEntry {
                captured_at,
                payload,
            },
        );
    }

    /// Number of stored entries, stale ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for OneCallCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}
