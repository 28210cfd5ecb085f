use serde::Serialize;

use crate::domain::customer::Customer;
use crate::domain::report::ReportCard;

/// Cards shown on the reports module, newest first.
#[derive(Debug, Default, Serialize)]
pub struct ReportsPageData {
    pub reports: Vec<ReportCard>,
}

/// Customer picker of the report builder.
#[derive(Debug, Serialize)]
pub struct ReportBuilderData {
    pub customers: Vec<Customer>,
}

/// Result of a completed generation.
#[derive(Debug)]
pub struct GeneratedReport {
    pub card: ReportCard,
    /// Rendered PDF, offered for immediate download.
    pub pdf: Vec<u8>,
}
