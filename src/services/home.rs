//! Data behind the overview widgets of the `inicio` module.

use chrono::{DateTime, Duration, Utc};

use crate::cache::{
    CalendarDay, FreshnessCache, KeyValueStore, PENDING_CACHE_KEY, RollingWindow, STATS_CACHE_KEY,
};
use crate::domain::customer::PENDING_STAGES;
use crate::dto::home::{ChartSeries, PendingCustomer, StatsWidget};
use crate::repository::CustomerReader;
use crate::services::ServiceResult;

/// Rows listed by the pending widget.
pub const PENDING_LIMIT: usize = 10;

/// Fixed figures shown next to the real total until these series are tracked.
const PLACEHOLDER_SERIES: [(&str, usize); 3] = [
    ("Clientes Cotizados", 1000),
    ("Clientes Pendientes", 2000),
    ("Clientes Probables", 3000),
];

fn stats_cache() -> FreshnessCache<RollingWindow> {
    FreshnessCache::new(STATS_CACHE_KEY, RollingWindow(Duration::hours(24)))
}

fn pending_cache() -> FreshnessCache<CalendarDay> {
    FreshnessCache::new(PENDING_CACHE_KEY, CalendarDay)
}

/// Customer count, served from the browser cache for up to a day.
pub fn load_stats<R, S>(repo: &R, store: &S, now: DateTime<Utc>) -> ServiceResult<StatsWidget>
where
    R: CustomerReader + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let total = stats_cache().get_or_fetch(store, now, || repo.count_customers())?;

    let mut series = vec![ChartSeries {
        label: "Total Clientes",
        value: total,
    }];
    series.extend(
        PLACEHOLDER_SERIES
            .iter()
            .map(|&(label, value)| ChartSeries { label, value }),
    );

    Ok(StatsWidget { total, series })
}

/// Customers waiting for a follow-up call, refreshed once per calendar day.
pub fn load_pending<R, S>(
    repo: &R,
    store: &S,
    now: DateTime<Utc>,
) -> ServiceResult<Vec<PendingCustomer>>
where
    R: CustomerReader + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let stages: Vec<String> = PENDING_STAGES.iter().map(|s| s.to_string()).collect();
    let pending = pending_cache().get_or_fetch(store, now, || {
        repo.list_customers_by_stage(&stages, PENDING_LIMIT)
            .map(|rows| rows.into_iter().map(PendingCustomer::from).collect::<Vec<_>>())
    })?;
    Ok(pending)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::cache::MemoryStore;
    use crate::domain::customer::{Customer, CustomerFields};
    use crate::domain::types::CustomerId;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn pending_customer(id: &str) -> Customer {
        Customer::new(
            CustomerId::new(id).unwrap(),
            CustomerFields {
                nombre: Some(format!("Cliente {id}")),
                telefono: Some("999".into()),
                etapa: Some("Retomar Contacto".into()),
                comentario: Some("llamar".into()),
                ..CustomerFields::default()
            },
        )
    }

    #[test]
    fn stats_include_the_total_and_placeholder_series() {
        let mut repo = MockRepository::new();
        repo.expect_count_customers().times(1).returning(|| Ok(42));
        let store = MemoryStore::new();

        let stats = load_stats(&repo, &store, noon(10)).unwrap();
        assert_eq!(stats.total, 42);
        let values: Vec<_> = stats.series.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![42, 1000, 2000, 3000]);

        // Second call within the window is served from the store.
        assert_eq!(load_stats(&repo, &store, noon(10)).unwrap().total, 42);
    }

    #[test]
    fn stats_refetch_after_a_day() {
        let mut repo = MockRepository::new();
        let mut totals = vec![5usize, 6].into_iter();
        repo.expect_count_customers()
            .times(2)
            .returning(move || Ok(totals.next().unwrap_or_default()));
        let store = MemoryStore::new();

        assert_eq!(load_stats(&repo, &store, noon(10)).unwrap().total, 5);
        assert_eq!(load_stats(&repo, &store, noon(11)).unwrap().total, 6);
    }

    #[test]
    fn pending_queries_every_stage_spelling_once_per_day() {
        let mut repo = MockRepository::new();
        repo.expect_list_customers_by_stage()
            .withf(|stages, limit| stages.len() == 3 && *limit == PENDING_LIMIT)
            .times(2)
            .returning(|_, _| Ok(vec![pending_customer("a"), pending_customer("b")]));
        let store = MemoryStore::new();

        let first = load_pending(&repo, &store, noon(10)).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].telefono.as_deref(), Some("999"));

        load_pending(&repo, &store, noon(10) + Duration::hours(11)).unwrap();
        load_pending(&repo, &store, noon(11)).unwrap();
    }

    #[test]
    fn cached_pending_entry_is_the_compact_projection() {
        let mut repo = MockRepository::new();
        repo.expect_list_customers_by_stage()
            .returning(|_, _| Ok(vec![pending_customer("a")]));
        let store = MemoryStore::new();
        load_pending(&repo, &store, noon(10)).unwrap();

        let raw = store.get(PENDING_CACHE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["value"][0]["id"], "a");
        assert!(json["value"][0].get("comentario").is_none());
        assert_eq!(json["timestamp"], noon(10).timestamp_millis());
    }

    #[test]
    fn repository_errors_surface() {
        let mut repo = MockRepository::new();
        repo.expect_count_customers()
            .returning(|| Err(RepositoryError::ConnectionError("down".into())));
        let store = MemoryStore::new();

        assert!(matches!(
            load_stats(&repo, &store, noon(10)),
            Err(ServiceError::Repository(_))
        ));
        assert!(store.get(STATS_CACHE_KEY).unwrap().is_none());
    }
}
