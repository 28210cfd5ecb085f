use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use serde::Deserialize;
use tera::{Context, Tera};

use crate::domain::module::DashboardModule;
use crate::dto::customers::CustomerListPage;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::cache::browser::{BrowserCaches, BrowserStore};
use crate::routes::{base_context, browser_key, redirect, render_template};
use crate::services::{
    customers as customers_service, home as home_service, reports as reports_service,
};
use crate::storage::fs::FsBlobStore;
use crate::views::registry::ListViews;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub modulo: Option<String>,
}

#[get("/")]
pub async fn index() -> impl Responder {
    redirect("/dashboard")
}

#[get("/dashboard")]
pub async fn show_dashboard(
    query: web::Query<DashboardQuery>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    store: web::Data<FsBlobStore>,
    views: web::Data<ListViews>,
    widget_caches: web::Data<BrowserCaches>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let module = DashboardModule::from_query(query.modulo.as_deref());
    let mut context = base_context(&flash_messages, Some(&user), module);

    let filled = match module {
        DashboardModule::Inicio => fill_home(
            &mut context,
            repo.get_ref(),
            &widget_caches.store(browser_key(&session)),
        ),
        DashboardModule::Clientes => {
            fill_customers(&mut context, repo.get_ref(), &session, views.get_ref())
        }
        DashboardModule::Reportes => fill_reports(&mut context, store.get_ref()),
    };

    match filled {
        Ok(()) => render_template(&tera, module.template(), &context),
        Err(response) => response,
    }
}

fn fill_home(
    context: &mut Context,
    repo: &DieselRepository,
    store: &BrowserStore<'_>,
) -> Result<(), HttpResponse> {
    let now = Utc::now();

    // Each widget degrades on its own.
    match home_service::load_stats(repo, store, now) {
        Ok(stats) => context.insert("stats", &stats),
        Err(err) => {
            log::error!("Failed to load stats: {err}");
            context.insert("stats_error", "No se pudo cargar las estadísticas.");
        }
    }
    match home_service::load_pending(repo, store, now) {
        Ok(pending) => context.insert("pending", &pending),
        Err(err) => {
            log::error!("Failed to load pending customers: {err}");
            context.insert("pending_error", "No se pudo cargar los clientes pendientes.");
        }
    }
    Ok(())
}

fn fill_customers(
    context: &mut Context,
    repo: &DieselRepository,
    session: &Session,
    views: &ListViews,
) -> Result<(), HttpResponse> {
    let loaded = views.with_view(browser_key(session), |view| {
        let loaded = customers_service::ensure_loaded(repo, view);
        context.insert("listing", &CustomerListPage::from(&*view));
        loaded
    });

    if let Err(err) = loaded {
        log::error!("Failed to load customers: {err}");
        context.insert("listing_error", "Error al cargar los clientes.");
    }
    Ok(())
}

fn fill_reports(context: &mut Context, store: &FsBlobStore) -> Result<(), HttpResponse> {
    match reports_service::list_reports(store) {
        Ok(data) => {
            context.insert("reports", &data.reports);
            Ok(())
        }
        Err(err) => {
            log::error!("Failed to list reports: {err}");
            FlashMessage::error("Error al cargar los reportes.").send();
            Err(redirect("/dashboard"))
        }
    }
}
