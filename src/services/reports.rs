//! Report generation, listing and deletion.
//!
//! A report is stored as two objects sharing one [`ReportId`]: the rendered
//! PDF and a JSON snapshot of the customers it was rendered from.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::customer::Customer;
use crate::domain::report::{REPORTS_PREFIX, ReportCard, ReportFacet, ReportId};
use crate::domain::types::CustomerId;
use crate::dto::reports::{GeneratedReport, ReportBuilderData, ReportsPageData};
use crate::export::pdf;
use crate::forms::reports::GenerateReportForm;
use crate::repository::CustomerReader;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::BlobStore;

/// Progress of one report generation attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ReportStage {
    Idle,
    Loading,
    Ready,
    Selecting,
    Generating,
    Succeeded(ReportId),
    Failed(String),
}

/// Walks one attempt from loading the customers to the stored report.
#[derive(Debug)]
pub struct ReportBuilder {
    stage: ReportStage,
    customers: Vec<Customer>,
    selected: Vec<Customer>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            stage: ReportStage::Idle,
            customers: Vec::new(),
            selected: Vec::new(),
        }
    }

    pub fn stage(&self) -> &ReportStage {
        &self.stage
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Reads the customers offered for selection.
    pub fn load<R>(&mut self, repo: &R) -> ServiceResult<()>
    where
        R: CustomerReader + ?Sized,
    {
        self.stage = ReportStage::Loading;
        match repo.list_all_customers() {
            Ok(customers) => {
                self.customers = customers;
                self.stage = ReportStage::Ready;
                Ok(())
            }
            Err(err) => self.fail(err.into()),
        }
    }

    /// Picks the customers to report on, in the order given.
    pub fn select(&mut self, ids: &[CustomerId]) -> ServiceResult<()> {
        if !matches!(self.stage, ReportStage::Ready | ReportStage::Selecting) {
            return Err(ServiceError::Report(format!(
                "cannot select customers while {:?}",
                self.stage
            )));
        }
        if ids.is_empty() {
            return Err(ServiceError::Form(
                "Seleccione al menos un cliente.".to_string(),
            ));
        }

        let mut selected = Vec::with_capacity(ids.len());
        for id in ids {
            match self.customers.iter().find(|c| &c.id == id) {
                Some(customer) => selected.push(customer.clone()),
                None => {
                    return Err(ServiceError::Form(format!("Cliente desconocido: {id}")));
                }
            }
        }

        self.selected = selected;
        self.stage = ReportStage::Selecting;
        Ok(())
    }

    /// Renders and stores the report for the current selection.
    ///
    /// Facets uploaded before a failure are left in place.
    pub fn generate<S>(&mut self, store: &S, now: DateTime<Utc>) -> ServiceResult<GeneratedReport>
    where
        S: BlobStore + ?Sized,
    {
        if self.stage != ReportStage::Selecting || self.selected.is_empty() {
            return Err(ServiceError::Report(format!(
                "nothing selected to generate while {:?}",
                self.stage
            )));
        }

        self.stage = ReportStage::Generating;
        match store_report(store, &self.selected, now) {
            Ok(report) => {
                self.stage = ReportStage::Succeeded(report.card.id.clone());
                Ok(report)
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail<T>(&mut self, err: ServiceError) -> ServiceResult<T> {
        log::error!("Report generation failed: {err}");
        self.stage = ReportStage::Failed(err.to_string());
        Err(err)
    }
}

fn store_report<S>(
    store: &S,
    customers: &[Customer],
    now: DateTime<Utc>,
) -> ServiceResult<GeneratedReport>
where
    S: BlobStore + ?Sized,
{
    let pdf = pdf::render_customer_report(customers)?;

    let id = ReportId::from_timestamp_millis(now.timestamp_millis());
    let pdf_key = id.object_key(ReportFacet::Pdf);
    let json_key = id.object_key(ReportFacet::Json);

    store.upload(&pdf_key, &pdf, ReportFacet::Pdf.content_type())?;

    let snapshot = serde_json::to_vec(customers)
        .map_err(|e| ServiceError::Report(format!("failed to encode snapshot: {e}")))?;
    store.upload(&json_key, &snapshot, ReportFacet::Json.content_type())?;

    let pdf_url = store.url(&pdf_key)?;
    log::info!("Stored report {id} with {} customers", customers.len());

    Ok(GeneratedReport {
        card: ReportCard {
            pdf_name: pdf_name(&id),
            id,
            pdf_url,
            customers: customers.to_vec(),
        },
        pdf,
    })
}

fn pdf_name(id: &ReportId) -> String {
    format!("{id}.{}", ReportFacet::Pdf.extension())
}

/// Customers offered by the report builder.
pub fn load_builder<R>(repo: &R) -> ServiceResult<ReportBuilderData>
where
    R: CustomerReader + ?Sized,
{
    let mut builder = ReportBuilder::new();
    builder.load(repo)?;
    Ok(ReportBuilderData {
        customers: builder.customers,
    })
}

/// Runs one full generation for the posted selection.
pub fn generate_report<R, S>(
    repo: &R,
    store: &S,
    form: &GenerateReportForm,
    now: DateTime<Utc>,
) -> ServiceResult<GeneratedReport>
where
    R: CustomerReader + ?Sized,
    S: BlobStore + ?Sized,
{
    let ids = form.customer_ids()?;
    if ids.is_empty() {
        return Err(ServiceError::Form(
            "Seleccione al menos un cliente.".to_string(),
        ));
    }

    let mut builder = ReportBuilder::new();
    builder.load(repo)?;
    builder.select(&ids)?;
    builder.generate(store, now)
}

fn read_snapshot<S>(store: &S, key: &str) -> Vec<Customer>
where
    S: BlobStore + ?Sized,
{
    let bytes = match store.download(key) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("Report snapshot {key} unavailable: {err}");
            return Vec::new();
        }
    };
    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        log::warn!("Report snapshot {key} is unreadable: {err}");
        Vec::new()
    })
}

/// One card per stored PDF, newest first.
pub fn list_reports<S>(store: &S) -> ServiceResult<ReportsPageData>
where
    S: BlobStore + ?Sized,
{
    let keys = store.list(REPORTS_PREFIX)?;

    let mut pdf_ids = Vec::new();
    let mut json_ids = HashSet::new();
    for key in &keys {
        match ReportId::parse_object_key(key) {
            Some((id, ReportFacet::Pdf)) => pdf_ids.push(id),
            Some((id, ReportFacet::Json)) => {
                json_ids.insert(id);
            }
            None => log::debug!("Ignoring non-report object {key}"),
        }
    }
    pdf_ids.sort_by(|a, b| b.timestamp_millis().cmp(&a.timestamp_millis()));

    let mut reports = Vec::with_capacity(pdf_ids.len());
    for id in pdf_ids {
        let customers = if json_ids.contains(&id) {
            read_snapshot(store, &id.object_key(ReportFacet::Json))
        } else {
            Vec::new()
        };
        reports.push(ReportCard {
            pdf_url: store.url(&id.object_key(ReportFacet::Pdf))?,
            pdf_name: pdf_name(&id),
            id,
            customers,
        });
    }

    Ok(ReportsPageData { reports })
}

/// Removes both facets of a report. Only the PDF is required to exist.
pub fn delete_report<S>(store: &S, report_id: &str) -> ServiceResult<()>
where
    S: BlobStore + ?Sized,
{
    let id: ReportId = report_id.parse()?;

    store.delete(&id.object_key(ReportFacet::Pdf)).map_err(|err| {
        log::error!("Failed to delete report {id}: {err}");
        ServiceError::from(err)
    })?;

    if let Err(err) = store.delete(&id.object_key(ReportFacet::Json)) {
        log::warn!("Snapshot of report {id} not deleted: {err}");
    }

    log::info!("Deleted report {id}");
    Ok(())
}
