#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, config::PersistentSession, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::{Key, time::Duration as CookieDuration};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::cache::browser::BrowserCaches;
#[cfg(feature = "server")]
use crate::db::{ConnectionOptions, establish_connection_pool};
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::auth::{logout, show_signin, signin};
#[cfg(feature = "server")]
use crate::routes::customers::{
    add_customer, apply_filters, change_page, delete_customer, export_customers, update_customer,
};
#[cfg(feature = "server")]
use crate::routes::dashboard::{index, show_dashboard};
#[cfg(feature = "server")]
use crate::routes::reports::{delete_report, generate_report, show_builder};
#[cfg(feature = "server")]
use crate::routes::storage::serve_object;
#[cfg(feature = "server")]
use crate::storage::fs::FsBlobStore;
#[cfg(feature = "server")]
use crate::views::registry::ListViews;

pub mod db;
pub mod domain;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod cache;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod export;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod storage;
#[cfg(feature = "server")]
pub mod views;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let options = ConnectionOptions {
        busy_timeout: Some(server_config.busy_timeout()),
        ..ConnectionOptions::default()
    };
    let pool = establish_connection_pool(&server_config.database_url, options).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let blob_store = FsBlobStore::new(
        &server_config.storage_root,
        server_config.storage_url_prefix.clone(),
    );
    std::fs::create_dir_all(blob_store.root())?;

    // List views and widget caches must be shared by every worker.
    let list_views = web::Data::new(ListViews::new(server_config.list_view_capacity));
    let widget_caches = web::Data::new(BrowserCaches::new(server_config.widget_cache_capacity));

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let session_ttl = CookieDuration::hours(server_config.session_ttl_hours);
    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_signin)
            .service(signin)
            .service(logout)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(index)
                    .service(show_dashboard)
                    .service(change_page)
                    .service(apply_filters)
                    .service(export_customers)
                    .service(add_customer)
                    .service(update_customer)
                    .service(delete_customer)
                    .service(show_builder)
                    .service(generate_report)
                    .service(delete_report)
                    .service(serve_object),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(blob_store.clone()))
            .app_data(list_views.clone())
            .app_data(widget_caches.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
