//! Process-wide store of customer list views, one per browser.

use std::sync::{Arc, Mutex, PoisonError};

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use uuid::Uuid;

use crate::views::customer_list::CustomerListController;

pub type SharedView = Arc<Mutex<CustomerListController>>;

/// Bounded map from browser key to its list view.
///
/// Every request of one browser works on the same shared controller; the
/// least recently used view is dropped once `capacity` views are held.
pub struct ListViews {
    views: Cache<Uuid, SharedView>,
}

impl ListViews {
    pub fn new(capacity: usize) -> Self {
        let capacity = u64::try_from(capacity.max(1)).unwrap_or(u64::MAX);
        let views = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(|key: Arc<Uuid>, _, cause| {
                log::debug!("Dropping list view {key}: {cause:?}");
            })
            .build();
        Self { views }
    }

    /// View stored under `key`, created empty on first use.
    pub fn get_or_create(&self, key: Uuid) -> SharedView {
        self.views
            .get_with(key, || Arc::new(Mutex::new(CustomerListController::new())))
    }

    /// Runs `f` with exclusive access to the view of `key`.
    ///
    /// Concurrent requests of the same browser are serialized on the view.
    pub fn with_view<T>(&self, key: Uuid, f: impl FnOnce(&mut CustomerListController) -> T) -> T {
        let view = self.get_or_create(key);
        let mut guard = view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn contains(&self, key: &Uuid) -> bool {
        self.views.contains_key(key)
    }

    /// Number of views held after pending evictions have run.
    pub fn len(&self) -> u64 {
        self.views.run_pending_tasks();
        self.views.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
