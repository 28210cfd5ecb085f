use crate::db::{DbConnection, DbPool};
use crate::domain::customer::{Customer, CustomerCursor, NewCustomer, UpdateCustomer};
use crate::domain::types::{CustomerId, UserEmail};
use crate::domain::user::{NewUser, User};
use crate::pagination::PagePosition;
use crate::repository::errors::RepositoryResult;

pub mod customer;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod user;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        self.pool.get().map_err(|err| {
            log::error!("Failed to get connection from pool: {err}");
            err.into()
        })
    }
}

/// One bounded range read over the customers ordered by `nombre`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerPageQuery {
    pub position: PagePosition<CustomerCursor>,
    pub limit: usize,
}

impl CustomerPageQuery {
    pub fn new(position: PagePosition<CustomerCursor>, limit: usize) -> Self {
        Self { position, limit }
    }
}

pub trait CustomerReader {
    /// Reads at most `query.limit` customers ordered by `(nombre, id)`.
    fn list_customer_page(&self, query: &CustomerPageQuery) -> RepositoryResult<Vec<Customer>>;
    /// Reads at most `limit` customers whose stage is one of `stages`, in store order.
    fn list_customers_by_stage(
        &self,
        stages: &[String],
        limit: usize,
    ) -> RepositoryResult<Vec<Customer>>;
    /// Reads the whole collection ordered by `(nombre, id)`.
    fn list_all_customers(&self) -> RepositoryResult<Vec<Customer>>;
    fn count_customers(&self) -> RepositoryResult<usize>;
}

pub trait CustomerWriter {
    /// Inserts a customer; the store picks the key.
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    /// Merges the present fields of `updates` into the stored customer.
    fn update_customer(
        &self,
        customer_id: &CustomerId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
    fn delete_customer(&self, customer_id: &CustomerId) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}
