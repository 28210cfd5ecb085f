//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::types::{CustomerId, UserEmail};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CustomerPageQuery, CustomerReader, CustomerWriter, UserReader, UserWriter};

mock! {
    pub Repository {}

    impl CustomerReader for Repository {
        fn list_customer_page(&self, query: &CustomerPageQuery) -> RepositoryResult<Vec<Customer>>;
        fn list_customers_by_stage(
            &self,
            stages: &[String],
            limit: usize,
        ) -> RepositoryResult<Vec<Customer>>;
        fn list_all_customers(&self) -> RepositoryResult<Vec<Customer>>;
        fn count_customers(&self) -> RepositoryResult<usize>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn update_customer(
            &self,
            customer_id: &CustomerId,
            updates: &UpdateCustomer,
        ) -> RepositoryResult<Customer>;
        fn delete_customer(&self, customer_id: &CustomerId) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }
}
