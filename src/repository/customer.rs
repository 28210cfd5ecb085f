//! Repository implementation for the customer collection.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::types::CustomerId;
use crate::models::customer::{
    Customer as DbCustomer, NewCustomer as DbNewCustomer, UpdateCustomer as DbUpdateCustomer,
};
use crate::pagination::PagePosition;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CustomerPageQuery, CustomerReader, CustomerWriter, DieselRepository};

fn into_domain(rows: Vec<DbCustomer>) -> RepositoryResult<Vec<Customer>> {
    rows.into_iter()
        .map(|row| Customer::try_from(row).map_err(RepositoryError::from))
        .collect()
}

fn to_sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

impl CustomerReader for DieselRepository {
    fn list_customer_page(&self, query: &CustomerPageQuery) -> RepositoryResult<Vec<Customer>> {
        use crate::schema::clientes;

        let mut conn = self.conn()?;

        let mut items = clientes::table
            .select(DbCustomer::as_select())
            .order((clientes::nombre.asc(), clientes::id.asc()))
            .limit(to_sql_limit(query.limit))
            .into_boxed();

        match &query.position {
            PagePosition::Start => {}
            PagePosition::After(cursor) => {
                let nombre = cursor.nombre.clone();
                let id = cursor.id.as_str().to_string();
                items = items.filter(
                    clientes::nombre
                        .gt(nombre.clone())
                        .or(clientes::nombre.eq(nombre).and(clientes::id.gt(id))),
                );
            }
            PagePosition::AtOrAfter(cursor) => {
                let nombre = cursor.nombre.clone();
                let id = cursor.id.as_str().to_string();
                items = items.filter(
                    clientes::nombre
                        .gt(nombre.clone())
                        .or(clientes::nombre.eq(nombre).and(clientes::id.ge(id))),
                );
            }
        }

        into_domain(items.load::<DbCustomer>(&mut conn)?)
    }

    fn list_customers_by_stage(
        &self,
        stages: &[String],
        limit: usize,
    ) -> RepositoryResult<Vec<Customer>> {
        use crate::schema::clientes;

        let mut conn = self.conn()?;

        let rows = clientes::table
            .filter(clientes::etapa.eq_any(stages.to_vec()))
            .select(DbCustomer::as_select())
            .limit(to_sql_limit(limit))
            .load::<DbCustomer>(&mut conn)?;

        into_domain(rows)
    }

    fn list_all_customers(&self) -> RepositoryResult<Vec<Customer>> {
        use crate::schema::clientes;

        let mut conn = self.conn()?;

        let rows = clientes::table
            .select(DbCustomer::as_select())
            .order((clientes::nombre.asc(), clientes::id.asc()))
            .load::<DbCustomer>(&mut conn)?;

        into_domain(rows)
    }

    fn count_customers(&self) -> RepositoryResult<usize> {
        use crate::schema::clientes;

        let mut conn = self.conn()?;
        let total: i64 = clientes::table.count().get_result(&mut conn)?;

        usize::try_from(total).map_err(|e| RepositoryError::Unexpected(e.to_string()))
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer> {
        use crate::schema::clientes;

        let mut conn = self.conn()?;

        let id = Uuid::new_v4().to_string();
        let insertable = DbNewCustomer::with_id(&id, new_customer);

        let row = diesel::insert_into(clientes::table)
            .values(&insertable)
            .returning(DbCustomer::as_returning())
            .get_result::<DbCustomer>(&mut conn)?;

        Customer::try_from(row).map_err(RepositoryError::from)
    }

    fn update_customer(
        &self,
        customer_id: &CustomerId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer> {
        use crate::schema::clientes;

        let mut conn = self.conn()?;

        // An empty changeset is rejected by Diesel; read the row back instead.
        let row = if updates.is_empty() {
            clientes::table
                .find(customer_id.as_str())
                .select(DbCustomer::as_select())
                .first::<DbCustomer>(&mut conn)?
        } else {
            let changes: DbUpdateCustomer = updates.into();
            diesel::update(clientes::table.find(customer_id.as_str()))
                .set(&changes)
                .returning(DbCustomer::as_returning())
                .get_result::<DbCustomer>(&mut conn)?
        };

        Customer::try_from(row).map_err(RepositoryError::from)
    }

    fn delete_customer(&self, customer_id: &CustomerId) -> RepositoryResult<()> {
        use crate::schema::clientes;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(clientes::table.find(customer_id.as_str())).execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
