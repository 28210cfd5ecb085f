//! Read-through caching of widget data in a per-browser key/value store.
//!
//! Entries are JSON documents of the form `{"value": ..., "timestamp": <epoch millis>}`.
//! Whether a stored entry may be served is decided by an [`ExpiryPolicy`].

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod browser;

/// Key of the cached customer count.
pub const STATS_CACHE_KEY: &str = "totalClientsCache";
/// Key of the cached pending-customers list.
pub const PENDING_CACHE_KEY: &str = "cachedClients";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store error: {0}")]
    Store(String),

    #[error("cache encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
}

/// Process-local store, one per value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    /// Write time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

pub trait ExpiryPolicy {
    fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool;
}

/// Fresh for a fixed span after the write.
#[derive(Clone, Copy, Debug)]
pub struct RollingWindow(pub Duration);

impl ExpiryPolicy for RollingWindow {
    fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(stored_at) < self.0
    }
}

/// Fresh until the UTC date changes.
#[derive(Clone, Copy, Debug)]
pub struct CalendarDay;

impl ExpiryPolicy for CalendarDay {
    fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        stored_at.date_naive() == now.date_naive()
    }
}

/// A single cached value under `key`, refreshed according to `policy`.
#[derive(Clone, Copy, Debug)]
pub struct FreshnessCache<P> {
    key: &'static str,
    policy: P,
}

impl<P: ExpiryPolicy> FreshnessCache<P> {
    pub const fn new(key: &'static str, policy: P) -> Self {
        Self { key, policy }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the stored value when fresh, otherwise calls `fetch` and stores its result.
    ///
    /// Store failures and unreadable entries are logged and treated as a miss,
    /// so only errors from `fetch` reach the caller.
    pub fn get_or_fetch<S, T, E, F>(&self, store: &S, now: DateTime<Utc>, fetch: F) -> Result<T, E>
    where
        S: KeyValueStore + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.read_fresh(store, now) {
            log::debug!("Cache hit for {}", self.key);
            return Ok(value);
        }

        log::debug!("Cache miss for {}", self.key);
        let value = fetch()?;

        let entry = CacheEntry {
            value,
            timestamp: now.timestamp_millis(),
        };
        if let Err(err) = self.write(store, &entry) {
            log::warn!("Failed to store cache entry {}: {err}", self.key);
        }
        Ok(entry.value)
    }

    fn read_fresh<S, T>(&self, store: &S, now: DateTime<Utc>) -> Option<T>
    where
        S: KeyValueStore + ?Sized,
        T: DeserializeOwned,
    {
        let raw = match store.get(self.key) {
            Ok(raw) => raw?,
            Err(err) => {
                log::warn!("Failed to read cache entry {}: {err}", self.key);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Discarding corrupt cache entry {}: {err}", self.key);
                return None;
            }
        };

        let stored_at = DateTime::<Utc>::from_timestamp_millis(entry.timestamp)?;
        self.policy
            .is_fresh(stored_at, now)
            .then_some(entry.value)
    }

    fn write<S, T>(&self, store: &S, entry: &CacheEntry<T>) -> Result<(), CacheError>
    where
        S: KeyValueStore + ?Sized,
        T: Serialize,
    {
        store.set(self.key, serde_json::to_string(entry)?)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn counting_fetch(calls: &Cell<u32>, value: u64) -> impl FnOnce() -> Result<u64, String> + '_ {
        move || {
            calls.set(calls.get() + 1);
            Ok(value)
        }
    }

    #[test]
    fn rolling_window_serves_cached_value_inside_the_window() {
        let store = MemoryStore::new();
        let cache = FreshnessCache::new(STATS_CACHE_KEY, RollingWindow(Duration::hours(24)));
        let calls = Cell::new(0);
        let t0 = at(2024, 6, 10, 8, 0);

        assert_eq!(cache.get_or_fetch(&store, t0, counting_fetch(&calls, 7)), Ok(7));
        let later = t0 + Duration::hours(23);
        assert_eq!(cache.get_or_fetch(&store, later, counting_fetch(&calls, 9)), Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn rolling_window_refetches_after_the_window() {
        let store = MemoryStore::new();
        let cache = FreshnessCache::new(STATS_CACHE_KEY, RollingWindow(Duration::hours(24)));
        let calls = Cell::new(0);
        let t0 = at(2024, 6, 10, 8, 0);

        cache
            .get_or_fetch(&store, t0, counting_fetch(&calls, 7))
            .unwrap();
        let expired = t0 + Duration::hours(25);
        assert_eq!(cache.get_or_fetch(&store, expired, counting_fetch(&calls, 9)), Ok(9));
        assert_eq!(calls.get(), 2);

        let raw = store.get(STATS_CACHE_KEY).unwrap().unwrap();
        let entry: CacheEntry<u64> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entry.value, 9);
        assert_eq!(entry.timestamp, expired.timestamp_millis());
    }

    #[test]
    fn calendar_day_expires_at_utc_midnight() {
        let store = MemoryStore::new();
        let cache = FreshnessCache::new(PENDING_CACHE_KEY, CalendarDay);
        let calls = Cell::new(0);
        let morning = at(2024, 6, 10, 0, 5);

        cache
            .get_or_fetch(&store, morning, counting_fetch(&calls, 1))
            .unwrap();
        assert_eq!(
            cache.get_or_fetch(&store, at(2024, 6, 10, 23, 59), counting_fetch(&calls, 2)),
            Ok(1)
        );
        assert_eq!(
            cache.get_or_fetch(&store, at(2024, 6, 11, 0, 1), counting_fetch(&calls, 3)),
            Ok(3)
        );
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn corrupt_entry_is_a_miss_and_gets_overwritten() {
        let store = MemoryStore::new();
        store.set(STATS_CACHE_KEY, "not json".into()).unwrap();
        let cache = FreshnessCache::new(STATS_CACHE_KEY, RollingWindow(Duration::hours(24)));
        let calls = Cell::new(0);

        assert_eq!(
            cache.get_or_fetch(&store, at(2024, 6, 10, 8, 0), counting_fetch(&calls, 4)),
            Ok(4)
        );
        assert_eq!(calls.get(), 1);
        let raw = store.get(STATS_CACHE_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<CacheEntry<u64>>(&raw).is_ok());
    }

    #[test]
    fn fetch_errors_are_returned_and_nothing_is_stored() {
        let store = MemoryStore::new();
        let cache = FreshnessCache::new(STATS_CACHE_KEY, CalendarDay);

        let result: Result<u64, String> =
            cache.get_or_fetch(&store, at(2024, 6, 10, 8, 0), || Err("offline".to_string()));
        assert_eq!(result, Err("offline".to_string()));
        assert!(store.get(STATS_CACHE_KEY).unwrap().is_none());
    }
}
