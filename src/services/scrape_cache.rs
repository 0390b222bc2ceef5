use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use itertools::Itertools;
use serde_json::Value;

pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    payload: Value,
    inserted_at: Instant,
}

/// Snapshot payloads keyed by the set of inputs that produced them.
///
/// Expiry is lazy: a stale entry is dropped when it is read, there is no sweep.
/// There is also no capacity bound, so the number of distinct input sets
/// requested over the process lifetime must stay small.
pub struct ScrapeCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for ScrapeCache {
    fn default() -> Self {
        ScrapeCache::new(DEFAULT_TTL, Arc::new(SystemClock))
    }
}

impl ScrapeCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        ScrapeCache {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Order-independent key: the inputs sorted and comma-joined.
    pub fn key_for<S: AsRef<str>>(inputs: &[S]) -> String {
        inputs.iter().map(|s| s.as_ref()).sorted().join(",")
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        match entries.get(key) {
            Some(entry) if now.saturating_duration_since(entry.inserted_at) < self.ttl => {
                Some(entry.payload.clone())
            }
            Some(_) => {
                log::debug!("Evicting expired scrape cache entry: {}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: String, payload: Value) {
        let inserted_at = self.clock.now();
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                key,
                CacheEntry {
                    payload,
                    inserted_at,
                },
            );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
