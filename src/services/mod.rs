//! Application services: plain functions over repository and storage traits.

use thiserror::Error;

use crate::export::ExportError;
use crate::repository::errors::RepositoryError;
use crate::storage::StorageError;

pub mod auth;
pub mod customers;
pub mod home;
pub mod reports;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    #[error("confirmation required")]
    ConfirmationRequired,

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Storage(StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("report error: {0}")]
    Report(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => ServiceError::NotFound,
            other => ServiceError::Storage(other),
        }
    }
}
