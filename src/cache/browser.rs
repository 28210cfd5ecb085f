//! Server-side widget cache shared by all workers, partitioned per browser.
//!
//! Only the browser key travels in the session cookie; cached values stay
//! in process memory.

use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::cache::{CacheError, KeyValueStore};

/// No widget entry stays fresh longer than a day.
const ENTRY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached widget values of every browser, bounded by entry count.
pub struct BrowserCaches {
    entries: Cache<(Uuid, String), String>,
}

impl BrowserCaches {
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity.max(1))
                .time_to_live(ENTRY_TTL)
                .build(),
        }
    }

    /// Store scoped to the browser identified by `owner`.
    pub fn store(&self, owner: Uuid) -> BrowserStore<'_> {
        BrowserStore {
            caches: self,
            owner,
        }
    }
}

/// Key/value view of one browser's entries.
pub struct BrowserStore<'a> {
    caches: &'a BrowserCaches,
    owner: Uuid,
}

impl KeyValueStore for BrowserStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.caches.entries.get(&(self.owner, key.to_string())))
    }

    fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.caches
            .entries
            .insert((self.owner, key.to_string()), value);
        Ok(())
    }
}
