//! Document renderers for customer data.

use thiserror::Error;

pub mod pdf;
pub mod xlsx;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("pdf rendering failed: {0}")]
    Pdf(String),

    #[error("xlsx rendering failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type ExportResult<T> = Result<T, ExportError>;
