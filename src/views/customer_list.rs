//! Paginated, filterable customer list.
//!
//! The controller owns exactly one page of customers fetched in `nombre`
//! order. Filters are applied to that page only and never cause a fetch.

use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, CustomerCursor};
use crate::domain::types::CustomerId;
use crate::pagination::{CursorPager, Direction, PAGE_SIZE};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CustomerPageQuery, CustomerReader};

/// Filters applied to the visible page. Empty values match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub kind: String,
}

impl CustomerFilters {
    /// Case-insensitive substring match on `nombre` or `empresa`.
    pub fn matches_search(&self, customer: &Customer) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&customer.fields.nombre, &customer.fields.empresa]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&needle))
    }

    /// Exact match of the stage and kind selections.
    pub fn matches_facets(&self, customer: &Customer) -> bool {
        facet_matches(&self.stage, customer.fields.etapa.as_deref())
            && facet_matches(&self.kind, customer.fields.tipo_cliente.as_deref())
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        self.matches_search(customer) && self.matches_facets(customer)
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.stage.is_empty() && self.kind.is_empty()
    }
}

fn facet_matches(selected: &str, value: Option<&str>) -> bool {
    selected.is_empty() || value == Some(selected)
}

#[derive(Clone, Debug)]
pub struct CustomerListController {
    pager: CursorPager<CustomerCursor>,
    rows: Vec<Customer>,
    filters: CustomerFilters,
    is_loading: bool,
    loaded: bool,
}

impl Default for CustomerListController {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerListController {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            pager: CursorPager::new(page_size),
            rows: Vec::new(),
            filters: CustomerFilters::default(),
            is_loading: false,
            loaded: false,
        }
    }

    /// Fetches the page reached by `direction`.
    ///
    /// Returns `Ok(false)` without touching any state or the repository when
    /// the move is impossible. On error the current page stays on screen.
    pub fn load<R>(&mut self, repo: &R, direction: Direction) -> RepositoryResult<bool>
    where
        R: CustomerReader + ?Sized,
    {
        let Some(position) = self.pager.position(direction) else {
            log::debug!("Ignoring {direction:?}: no page boundary to move from");
            return Ok(false);
        };

        self.is_loading = true;
        let query = CustomerPageQuery::new(position, self.pager.page_size());
        let result = repo.list_customer_page(&query);
        self.is_loading = false;

        let rows = result?;
        let first = rows.first().map(Customer::cursor);
        let last = rows.last().map(Customer::cursor);
        self.pager.record(direction, first, last, rows.len());
        self.rows = rows;
        self.loaded = true;
        Ok(true)
    }

    /// Rows of the visible page passing the current filters, in fetch order.
    pub fn filtered(&self) -> Vec<&Customer> {
        self.rows
            .iter()
            .filter(|customer| self.filters.matches(customer))
            .collect()
    }

    pub fn rows(&self) -> &[Customer] {
        &self.rows
    }

    pub fn filters(&self) -> &CustomerFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: CustomerFilters) {
        self.filters = filters;
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn has_next(&self) -> bool {
        self.pager.has_next()
    }

    pub fn has_prev(&self) -> bool {
        self.pager.has_prev()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether a page has been fetched since the view was created.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Shows a freshly created customer at the top of the page.
    pub fn insert_local(&mut self, customer: Customer) {
        self.rows.insert(0, customer);
    }

    /// Replaces the visible row with the same id. Returns `false` when it is not on screen.
    pub fn patch_local(&mut self, customer: Customer) -> bool {
        match self.rows.iter_mut().find(|row| row.id == customer.id) {
            Some(row) => {
                *row = customer;
                true
            }
            None => false,
        }
    }

    /// Drops the visible row with `id`. Returns `false` when it is not on screen.
    pub fn remove_local(&mut self, id: &CustomerId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| &row.id != id);
        self.rows.len() != before
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::domain::customer::CustomerFields;
    use crate::pagination::PagePosition;
    use crate::repository::errors::RepositoryError;

    /// Sorted in-memory collection that records every query it serves.
    struct FakeCustomers {
        rows: Vec<Customer>,
        queries: RefCell<Vec<CustomerPageQuery>>,
        fail: bool,
    }

    impl FakeCustomers {
        fn new(mut rows: Vec<Customer>) -> Self {
            rows.sort_by_key(|row| key(&row.cursor()));
            Self {
                rows,
                queries: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        fn query_count(&self) -> usize {
            self.queries.borrow().len()
        }
    }

    fn key(c: &CustomerCursor) -> (String, String) {
        (c.nombre.clone(), c.id.as_str().to_string())
    }

    impl CustomerReader for FakeCustomers {
        fn list_customer_page(
            &self,
            query: &CustomerPageQuery,
        ) -> RepositoryResult<Vec<Customer>> {
            self.queries.borrow_mut().push(query.clone());
            if self.fail {
                return Err(RepositoryError::ConnectionError("offline".into()));
            }
            Ok(self
                .rows
                .iter()
                .filter(|row| {
                    let row_key = key(&row.cursor());
                    match &query.position {
                        PagePosition::Start => true,
                        PagePosition::After(c) => row_key > key(c),
                        PagePosition::AtOrAfter(c) => row_key >= key(c),
                    }
                })
                .take(query.limit)
                .cloned()
                .collect())
        }

        fn list_customers_by_stage(
            &self,
            _stages: &[String],
            _limit: usize,
        ) -> RepositoryResult<Vec<Customer>> {
            unimplemented!()
        }

        fn list_all_customers(&self) -> RepositoryResult<Vec<Customer>> {
            Ok(self.rows.clone())
        }

        fn count_customers(&self) -> RepositoryResult<usize> {
            Ok(self.rows.len())
        }
    }

    fn customer(n: usize, stage: &str, kind: &str) -> Customer {
        Customer::new(
            CustomerId::new(format!("id{n:03}")).unwrap(),
            CustomerFields {
                nombre: Some(format!("Cliente {n:03}")),
                empresa: Some(if n % 2 == 0 { "Acme SAC" } else { "Andes EIRL" }.into()),
                etapa: Some(stage.into()),
                tipo_cliente: Some(kind.into()),
                ..CustomerFields::default()
            },
        )
    }

    fn collection(n: usize) -> FakeCustomers {
        FakeCustomers::new(
            (0..n)
                .map(|i| customer(i, "Contacto Inicial-1", "Prospecto"))
                .collect(),
        )
    }

    fn names(rows: &[Customer]) -> Vec<String> {
        rows.iter().map(|c| c.display_name().to_string()).collect()
    }

    #[test]
    fn start_then_next_walks_pages_in_order() {
        let repo = collection(25);
        let mut view = CustomerListController::new();

        assert!(view.load(&repo, Direction::Start).unwrap());
        assert_eq!(view.page(), 1);
        assert_eq!(view.rows().len(), 10);
        assert!(view.has_next());
        assert!(!view.has_prev());

        assert!(view.load(&repo, Direction::Next).unwrap());
        assert_eq!(view.page(), 2);
        assert_eq!(view.rows()[0].display_name(), "Cliente 010");

        assert!(view.load(&repo, Direction::Next).unwrap());
        assert_eq!(view.page(), 3);
        assert_eq!(view.rows().len(), 5);
        assert!(!view.has_next());
        assert!(view.has_prev());
    }

    #[test]
    fn prev_on_first_page_is_a_noop_without_query() {
        let repo = collection(25);
        let mut view = CustomerListController::new();
        view.load(&repo, Direction::Start).unwrap();
        let before = names(view.rows());

        assert!(!view.load(&repo, Direction::Prev).unwrap());
        assert_eq!(repo.query_count(), 1);
        assert_eq!(names(view.rows()), before);
        assert_eq!(view.page(), 1);
        assert!(!view.is_loading());
    }

    #[test]
    fn next_before_any_load_is_a_noop() {
        let repo = collection(5);
        let mut view = CustomerListController::new();
        assert!(!view.load(&repo, Direction::Next).unwrap());
        assert_eq!(repo.query_count(), 0);
        assert!(!view.is_loaded());
    }

    #[test]
    fn next_then_prev_returns_to_the_same_page() {
        let repo = collection(35);
        let mut view = CustomerListController::new();
        view.load(&repo, Direction::Start).unwrap();
        view.load(&repo, Direction::Next).unwrap();
        let page_two = names(view.rows());

        view.load(&repo, Direction::Next).unwrap();
        view.load(&repo, Direction::Prev).unwrap();
        assert_eq!(view.page(), 2);
        assert_eq!(names(view.rows()), page_two);

        view.load(&repo, Direction::Prev).unwrap();
        assert_eq!(view.page(), 1);
        assert_eq!(view.rows()[0].display_name(), "Cliente 000");
        assert!(!view.has_prev());
    }

    #[test]
    fn full_last_page_offers_one_empty_next_page() {
        let repo = collection(20);
        let mut view = CustomerListController::new();
        view.load(&repo, Direction::Start).unwrap();
        view.load(&repo, Direction::Next).unwrap();
        assert!(view.has_next());

        assert!(view.load(&repo, Direction::Next).unwrap());
        assert_eq!(view.page(), 3);
        assert!(view.rows().is_empty());
        assert!(!view.has_next());
        assert!(!view.load(&repo, Direction::Next).unwrap());
    }

    #[test]
    fn failed_load_keeps_the_current_page() {
        let mut repo = collection(25);
        let mut view = CustomerListController::new();
        view.load(&repo, Direction::Start).unwrap();
        let before = names(view.rows());

        repo.fail = true;
        assert!(view.load(&repo, Direction::Next).is_err());
        assert!(!view.is_loading());
        assert_eq!(view.page(), 1);
        assert_eq!(names(view.rows()), before);
    }

    #[test]
    fn three_of_ten_finalized_customers_survive_the_stage_filter() {
        let rows = (0..10)
            .map(|i| {
                let stage = if i % 3 == 0 && i > 0 { "Finalizado" } else { "Retomar Contacto" };
                customer(i, stage, "Prospecto")
            })
            .collect();
        let repo = FakeCustomers::new(rows);
        let mut view = CustomerListController::new();
        view.load(&repo, Direction::Start).unwrap();

        view.set_filters(CustomerFilters {
            stage: "Finalizado".into(),
            ..CustomerFilters::default()
        });
        let filtered = view.filtered();
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|c| c.fields.etapa.as_deref() == Some("Finalizado")));
        assert_eq!(repo.query_count(), 1);
    }

    #[test]
    fn filters_commute_and_are_idempotent() {
        let rows = (0..10)
            .map(|i| {
                let stage = if i < 5 { "Finalizado" } else { "Retomar Contacto" };
                customer(i, stage, "Prospecto")
            })
            .collect();
        let repo = FakeCustomers::new(rows);
        let mut view = CustomerListController::new();
        view.load(&repo, Direction::Start).unwrap();

        let search = CustomerFilters {
            search: "acme".into(),
            ..CustomerFilters::default()
        };
        let stage = CustomerFilters {
            stage: "Finalizado".into(),
            ..CustomerFilters::default()
        };
        let both = CustomerFilters {
            search: "ACME".into(),
            stage: "Finalizado".into(),
            ..CustomerFilters::default()
        };

        let search_then_stage: Vec<_> = view
            .rows()
            .iter()
            .filter(|c| search.matches(c))
            .filter(|c| stage.matches(c))
            .map(|c| c.id.clone())
            .collect();
        let stage_then_search: Vec<_> = view
            .rows()
            .iter()
            .filter(|c| stage.matches(c))
            .filter(|c| search.matches(c))
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(search_then_stage, stage_then_search);

        view.set_filters(both.clone());
        let once: Vec<_> = view.filtered().into_iter().map(|c| c.id.clone()).collect();
        view.set_filters(both);
        let twice: Vec<_> = view.filtered().into_iter().map(|c| c.id.clone()).collect();
        assert_eq!(once, twice);
        assert_eq!(once, search_then_stage);
        // Acme rows are the even ones among the first five.
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn empty_filters_pass_every_row() {
        let repo = collection(7);
        let mut view = CustomerListController::new();
        view.load(&repo, Direction::Start).unwrap();
        assert!(view.filters().is_empty());
        assert_eq!(view.filtered().len(), 7);
    }

    #[test]
    fn local_mutations_touch_only_the_matching_row() {
        let repo = collection(4);
        let mut view = CustomerListController::new();
        view.load(&repo, Direction::Start).unwrap();

        let created = customer(99, "Finalizado", "Frecuentes");
        view.insert_local(created.clone());
        assert_eq!(view.rows().len(), 5);
        assert_eq!(view.rows()[0], created);

        let mut changed = view.rows()[2].clone();
        changed.fields.etapa = Some("Finalizado".into());
        assert!(view.patch_local(changed.clone()));
        assert_eq!(view.rows()[2], changed);

        let gone = view.rows()[3].id.clone();
        assert!(view.remove_local(&gone));
        assert_eq!(view.rows().len(), 4);
        assert!(view.rows().iter().all(|c| c.id != gone));
        assert!(!view.remove_local(&gone));
        assert_eq!(repo.query_count(), 1);
    }
}
