//! TTL-based result cache with an injected clock.
//!
//! The cache is an unbounded map: the key space is small (known segment
//! ids times a handful of region tiles) and process lifetime is short, so
//! there is no capacity-based eviction. Stale entries are treated as
//! absent, not actively deleted; an explicit [`TtlCache::clear`] is the
//! only other way out.
//!
//! Concurrent writers computing the same key may each perform the
//! computation and both insert; values are deterministic for a given key
//! within the TTL window, so last-write-wins is fine.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Source of "now", injectable so tests control TTL expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now = *now + delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// Unbounded map of cached values with per-entry TTL.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl, clock }
    }

    /// Fresh value for `key`, or `None` when absent or past its TTL.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let entry = entries.get(key)?;
        if self.clock.now() > entry.inserted_at + self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(key, CacheEntry { value, inserted_at: self.clock.now() });
    }

    /// Administrative eviction of everything.
    pub fn clear(&self) {
        self.entries.lock().expect("cache mutex poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_get_within_ttl() {
        let clock = Arc::new(ManualClock::new(fixed_start()));
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::hours(24), clock.clone());

        cache.insert("a".into(), 1);
        assert_eq!(cache.get(&"a".into()), Some(1));

        // Exactly at the TTL boundary the entry is still fresh.
        clock.advance(Duration::hours(24));
        assert_eq!(cache.get(&"a".into()), Some(1));
    }

    #[test]
    fn test_stale_entries_treated_as_absent() {
        let clock = Arc::new(ManualClock::new(fixed_start()));
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::hours(24), clock.clone());

        cache.insert("a".into(), 1);
        clock.advance(Duration::hours(24) + Duration::seconds(1));
        assert_eq!(cache.get(&"a".into()), None);

        // Re-inserting restarts the window.
        cache.insert("a".into(), 2);
        assert_eq!(cache.get(&"a".into()), Some(2));
    }

    #[test]
    fn test_clear_evicts_everything() {
        let clock = Arc::new(ManualClock::new(fixed_start()));
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::hours(24), clock);

        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        cache.clear();
        assert_eq!(cache.get(&"a".into()), None);
        assert_eq!(cache.get(&"b".into()), None);
    }
}
