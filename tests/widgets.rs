use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpResponse, Responder, get, http::header, test, web};
use chrono::Utc;

use compina_crm::cache::browser::BrowserCaches;
use compina_crm::domain::customer::{CustomerFields, NewCustomer};
use compina_crm::repository::{CustomerReader, CustomerWriter, DieselRepository};
use compina_crm::routes::browser_key;
use compina_crm::services::home::{PENDING_LIMIT, load_pending};

mod common;

const SECRET: &str = "widget-secret-widget-secret-widget-secret-widget-secret-widget-secret";

#[get("/pending")]
async fn pending(
    session: Session,
    repo: web::Data<DieselRepository>,
    caches: web::Data<BrowserCaches>,
) -> impl Responder {
    let store = caches.store(browser_key(&session));
    match load_pending(repo.get_ref(), &store, Utc::now()) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

fn seed_long_pending_rows(repo: &DieselRepository) {
    for i in 0..PENDING_LIMIT {
        repo.create_customer(&NewCustomer::new(CustomerFields {
            nombre: Some(format!("{i:03}{}", "N".repeat(117))),
            empresa: Some("E".repeat(88)),
            telefono: Some("+51 999 888 777".into()),
            etapa: Some("Retomar Contacto".into()),
            ..CustomerFields::default()
        }))
        .unwrap();
    }
}

#[actix_web::test]
async fn pending_widget_is_cached_outside_the_cookie() {
    let test_db = common::TestDb::new("pending_widget_cached.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_long_pending_rows(&repo);

    let app = test::init_service(
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::from(SECRET.as_bytes()))
                    .cookie_secure(false)
                    .build(),
            )
            .service(pending)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(BrowserCaches::new(16))),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/pending").to_request()).await;
    assert!(resp.status().is_success());

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .len();
    assert!(set_cookie < 512, "session cookie is {set_cookie} bytes");

    let cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "id")
        .expect("session cookie")
        .into_owned();
    let first: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(first.len(), PENDING_LIMIT);

    // A second mount on the same day must not read the table again.
    for customer in repo.list_all_customers().unwrap() {
        repo.delete_customer(&customer.id).unwrap();
    }

    let req = test::TestRequest::get()
        .uri("/pending")
        .cookie(cookie)
        .to_request();
    let second: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second, first);

    // Another browser has no cached entry yet.
    let fresh: Vec<serde_json::Value> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/pending").to_request())
            .await;
    assert!(fresh.is_empty());
}
