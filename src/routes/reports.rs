use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::domain::module::DashboardModule;
use crate::domain::report::ReportFacet;
use crate::export::pdf;
use crate::forms::reports::GenerateReportForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{attachment, base_context, module_url, redirect, render_template};
use crate::services::{ServiceError, reports as reports_service};
use crate::storage::fs::FsBlobStore;

const BUILDER_PATH: &str = "/reportes/new";

fn back_to_reports() -> HttpResponse {
    redirect(&module_url(DashboardModule::Reportes))
}

#[get("/reportes/new")]
pub async fn show_builder(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match reports_service::load_builder(repo.get_ref()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, Some(&user), DashboardModule::Reportes);
            context.insert("customers", &data.customers);
            render_template(&tera, "reports/new.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load report builder: {err}");
            FlashMessage::error("Error al cargar los clientes.").send();
            back_to_reports()
        }
    }
}

#[post("/reportes")]
pub async fn generate_report(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    store: web::Data<FsBlobStore>,
    body: web::Bytes,
) -> impl Responder {
    let form = match GenerateReportForm::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed report form: {err}");
            FlashMessage::error("Formulario inválido.").send();
            return redirect(BUILDER_PATH);
        }
    };

    match reports_service::generate_report(repo.get_ref(), store.get_ref(), &form, Utc::now()) {
        Ok(report) => {
            FlashMessage::success(format!("Reporte {} generado.", report.card.id)).send();
            attachment(
                report.pdf,
                ReportFacet::Pdf.content_type(),
                pdf::DOWNLOAD_NAME,
            )
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(BUILDER_PATH)
        }
        Err(err) => {
            log::error!("Failed to generate report: {err}");
            FlashMessage::error("Error al generar el reporte.").send();
            redirect(BUILDER_PATH)
        }
    }
}

#[post("/reportes/{report_id}/delete")]
pub async fn delete_report(
    report_id: web::Path<String>,
    _user: AuthenticatedUser,
    store: web::Data<FsBlobStore>,
) -> impl Responder {
    match reports_service::delete_report(store.get_ref(), &report_id) {
        Ok(()) => {
            FlashMessage::success("Reporte eliminado.").send();
        }
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Reporte no encontrado.").send();
        }
        Err(err) => {
            log::error!("Failed to delete report {report_id}: {err}");
            FlashMessage::error("Error al eliminar el reporte.").send();
        }
    }
    back_to_reports()
}
