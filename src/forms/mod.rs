//! Form definitions backing the dashboard routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod customers;
pub mod reports;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid customer id")]
    InvalidCustomerId,

    #[error("name is required")]
    MissingName,

    #[error("malformed form payload: {0}")]
    Payload(String),
}
