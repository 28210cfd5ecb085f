use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::domain::module::DashboardModule;
use crate::export::xlsx;
use crate::forms::customers::{CustomerForm, DeleteCustomerForm, FiltersForm, PageForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{attachment, browser_key, module_url, redirect};
use crate::services::{ServiceError, customers as customers_service};
use crate::views::customer_list::CustomerListController;
use crate::views::registry::ListViews;

/// Runs `f` on this browser's list view.
fn with_view<T>(
    session: &Session,
    views: &ListViews,
    f: impl FnOnce(&mut CustomerListController) -> T,
) -> T {
    views.with_view(browser_key(session), f)
}

fn back_to_list() -> HttpResponse {
    redirect(&module_url(DashboardModule::Clientes))
}

#[post("/clientes/page")]
pub async fn change_page(
    _user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    views: web::Data<ListViews>,
    web::Form(form): web::Form<PageForm>,
) -> impl Responder {
    let result = with_view(&session, &views, |view| {
        customers_service::navigate(repo.get_ref(), view, form.direction)
    });
    if let Err(err) = result {
        log::error!("Failed to change page: {err}");
        FlashMessage::error("Error al cargar los clientes.").send();
    }
    back_to_list()
}

#[post("/clientes/filters")]
pub async fn apply_filters(
    _user: AuthenticatedUser,
    session: Session,
    views: web::Data<ListViews>,
    web::Form(form): web::Form<FiltersForm>,
) -> impl Responder {
    with_view(&session, &views, |view| {
        customers_service::apply_filters(view, form);
    });
    back_to_list()
}

#[post("/clientes/add")]
pub async fn add_customer(
    _user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    views: web::Data<ListViews>,
    web::Form(form): web::Form<CustomerForm>,
) -> impl Responder {
    let result = with_view(&session, &views, |view| {
        customers_service::create_customer(repo.get_ref(), view, form)
    });
    match result {
        Ok(customer) => {
            FlashMessage::success(format!("Cliente {} agregado.", customer.display_name())).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(format!("Formulario inválido: {message}")).send();
        }
        Err(err) => {
            log::error!("Failed to add a customer: {err}");
            FlashMessage::error("Error al agregar el cliente.").send();
        }
    }
    back_to_list()
}

#[post("/clientes/{customer_id}/update")]
pub async fn update_customer(
    customer_id: web::Path<String>,
    _user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    views: web::Data<ListViews>,
    web::Form(form): web::Form<CustomerForm>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();
    let result = with_view(&session, &views, |view| {
        customers_service::update_customer(repo.get_ref(), view, &customer_id, form)
    });
    match result {
        Ok(_) => {
            FlashMessage::success("Cliente actualizado.").send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente no encontrado.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(format!("Formulario inválido: {message}")).send();
        }
        Err(err) => {
            log::error!("Failed to update customer {customer_id}: {err}");
            FlashMessage::error("Error al actualizar el cliente.").send();
        }
    }
    back_to_list()
}

#[post("/clientes/{customer_id}/delete")]
pub async fn delete_customer(
    customer_id: web::Path<String>,
    _user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    views: web::Data<ListViews>,
    web::Form(form): web::Form<DeleteCustomerForm>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();
    let result = with_view(&session, &views, |view| {
        customers_service::delete_customer(repo.get_ref(), view, &customer_id, &form)
    });
    match result {
        Ok(()) => {
            FlashMessage::success("Cliente eliminado.").send();
        }
        Err(ServiceError::ConfirmationRequired) => {
            FlashMessage::warning("Confirme la eliminación del cliente.").send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente no encontrado.").send();
        }
        Err(err) => {
            log::error!("Failed to delete customer {customer_id}: {err}");
            FlashMessage::error("Error al eliminar el cliente.").send();
        }
    }
    back_to_list()
}

#[get("/clientes/export")]
pub async fn export_customers(
    _user: AuthenticatedUser,
    session: Session,
    views: web::Data<ListViews>,
) -> impl Responder {
    let result = with_view(&session, &views, |view| {
        customers_service::export_customers(view)
    });
    match result {
        Ok(bytes) => attachment(
            bytes,
            crate::storage::content_type_for(xlsx::DOWNLOAD_NAME),
            xlsx::DOWNLOAD_NAME,
        ),
        Err(err) => {
            log::error!("Failed to export customers: {err}");
            FlashMessage::error("Error al exportar los clientes.").send();
            back_to_list()
        }
    }
}
