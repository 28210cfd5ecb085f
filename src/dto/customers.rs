use serde::Serialize;

use crate::domain::customer::{Customer, KIND_FILTERS, STAGE_FILTERS};
use crate::views::customer_list::{CustomerFilters, CustomerListController};

/// Everything the customer list template needs from one controller.
#[derive(Debug, Serialize)]
pub struct CustomerListPage {
    pub customers: Vec<Customer>,
    pub filters: CustomerFilters,
    pub page: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub stage_options: &'static [&'static str],
    pub kind_options: &'static [&'static str],
}

impl From<&CustomerListController> for CustomerListPage {
    fn from(view: &CustomerListController) -> Self {
        Self {
            customers: view.filtered().into_iter().cloned().collect(),
            filters: view.filters().clone(),
            page: view.page(),
            has_next: view.has_next(),
            has_prev: view.has_prev(),
            stage_options: &STAGE_FILTERS,
            kind_options: &KIND_FILTERS,
        }
    }
}
