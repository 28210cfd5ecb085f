//! Customer list navigation and CRUD against one list view.

use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::export::xlsx;
use crate::forms::customers::{CustomerForm, DeleteCustomerForm, FiltersForm};
use crate::pagination::Direction;
use crate::repository::{CustomerReader, CustomerWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::views::customer_list::CustomerListController;

/// Moves the view to the page reached by `direction`.
///
/// Returns `false` when the move was not possible and nothing was queried.
pub fn navigate<R>(
    repo: &R,
    view: &mut CustomerListController,
    direction: Direction,
) -> ServiceResult<bool>
where
    R: CustomerReader + ?Sized,
{
    view.load(repo, direction).map_err(|err| {
        log::error!("Failed to load customer page ({direction:?}): {err}");
        ServiceError::from(err)
    })
}

/// Fetches the first page when the view has never been loaded.
pub fn ensure_loaded<R>(repo: &R, view: &mut CustomerListController) -> ServiceResult<()>
where
    R: CustomerReader + ?Sized,
{
    if !view.is_loaded() {
        navigate(repo, view, Direction::Start)?;
    }
    Ok(())
}

pub fn apply_filters(view: &mut CustomerListController, form: FiltersForm) {
    view.set_filters(form.into());
}

/// Stores a new customer and shows it at the top of the visible page.
pub fn create_customer<R>(
    repo: &R,
    view: &mut CustomerListController,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let new_customer = form.into_new_customer()?;
    let customer = repo.create_customer(&new_customer).map_err(|err| {
        log::error!("Failed to create customer: {err}");
        ServiceError::from(err)
    })?;

    view.insert_local(customer.clone());
    Ok(customer)
}

/// Merges the posted attributes into the stored customer and the visible row.
pub fn update_customer<R>(
    repo: &R,
    view: &mut CustomerListController,
    customer_id: &str,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let customer_id = CustomerId::new(customer_id)?;
    let updates = form.into_update()?;

    let customer = repo
        .update_customer(&customer_id, &updates)
        .map_err(|err| {
            log::error!("Failed to update customer {customer_id}: {err}");
            ServiceError::from(err)
        })?;

    view.patch_local(customer.clone());
    Ok(customer)
}

/// Deletes a customer once the user has confirmed it.
pub fn delete_customer<R>(
    repo: &R,
    view: &mut CustomerListController,
    customer_id: &str,
    form: &DeleteCustomerForm,
) -> ServiceResult<()>
where
    R: CustomerWriter + ?Sized,
{
    if !form.confirmed {
        return Err(ServiceError::ConfirmationRequired);
    }

    let customer_id = CustomerId::new(customer_id)?;
    repo.delete_customer(&customer_id).map_err(|err| {
        log::error!("Failed to delete customer {customer_id}: {err}");
        ServiceError::from(err)
    })?;

    view.remove_local(&customer_id);
    Ok(())
}

/// Workbook of the rows currently passing the view's filters.
pub fn export_customers(view: &CustomerListController) -> ServiceResult<Vec<u8>> {
    Ok(xlsx::customers_workbook(view.filtered())?)
}
