use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::{Duration, Utc};
use tera::Tera;

use crate::domain::module::DashboardModule;
use crate::forms::auth::SignInForm;
use crate::middleware::SIGNIN_PATH;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::auth::{self as auth_service, SIGN_IN_FAILED};

#[get("/auth/signin")]
pub async fn show_signin(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, DashboardModule::default());
    render_template(&tera, "auth/signin.html", &context)
}

#[post("/auth/signin")]
pub async fn signin(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignInForm>,
) -> impl Responder {
    let ttl = Duration::hours(server_config.session_ttl_hours);
    let token = match auth_service::sign_in(
        repo.get_ref(),
        &form,
        &server_config.secret,
        ttl,
        Utc::now(),
    ) {
        Ok(token) => token,
        Err(_) => {
            FlashMessage::error(SIGN_IN_FAILED).send();
            return redirect(SIGNIN_PATH);
        }
    };

    match Identity::login(&request.extensions(), token) {
        Ok(_) => redirect("/dashboard"),
        Err(err) => {
            log::error!("Failed to attach identity: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/auth/logout")]
pub async fn logout(user: Option<Identity>) -> impl Responder {
    if let Some(user) = user {
        user.logout();
    }
    redirect(SIGNIN_PATH)
}
