//! Actix handlers and the helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};
use uuid::Uuid;

use crate::domain::module::DashboardModule;
use crate::models::auth::AuthenticatedUser;

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod reports;
pub mod storage;

/// Session key holding the opaque id of this browser's server-side state.
pub const BROWSER_KEY_SESSION_KEY: &str = "browser_key";

/// Maps a flash message level to the alert class used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

#[derive(Serialize)]
struct Alert<'a> {
    message: &'a str,
    level: &'static str,
}

/// Context shared by every page: alerts, the signed-in user and the menu.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_module: DashboardModule,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| Alert {
            message: f.content(),
            level: alert_level_to_str(&f.level()),
        })
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    if let Some(user) = user {
        context.insert("current_user", user);
    }
    context.insert("current_module", current_module.as_str());
    context.insert("modules", &DashboardModule::ALL.map(DashboardModule::as_str));
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Sends `bytes` as a file download.
pub fn attachment(bytes: Vec<u8>, content_type: &str, file_name: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type.to_string())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(bytes)
}

/// Key of this browser's list view and widget cache, created on first use.
pub fn browser_key(session: &Session) -> Uuid {
    match session.get::<Uuid>(BROWSER_KEY_SESSION_KEY) {
        Ok(Some(key)) => return key,
        Ok(None) => {}
        Err(err) => log::warn!("Discarding unreadable browser key: {err}"),
    }

    let key = Uuid::new_v4();
    if let Err(err) = session.insert(BROWSER_KEY_SESSION_KEY, key) {
        log::error!("Failed to store browser key in session: {err}");
    }
    key
}

/// Location of a dashboard module page.
pub fn module_url(module: DashboardModule) -> String {
    format!("/dashboard?modulo={}", module.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_urls_use_the_query_parameter() {
        assert_eq!(
            module_url(DashboardModule::Clientes),
            "/dashboard?modulo=clientes"
        );
    }

    #[test]
    fn redirect_is_see_other() {
        let response = redirect("/dashboard");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/dashboard"
        );
    }
}
