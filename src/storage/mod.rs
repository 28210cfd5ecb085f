//! Blob storage for generated artifacts.
//!
//! Objects are addressed by slash-separated keys such as
//! `reportes/reporte_1718000000000.pdf`. Listing is by prefix and every stored
//! object can be handed out as a retrievable URL.

use thiserror::Error;

pub mod fs;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("invalid object key: {0}")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

pub trait BlobStore {
    fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> StorageResult<()>;
    fn download(&self, key: &str) -> StorageResult<Vec<u8>>;
    /// Keys of the objects directly under `prefix`, sorted.
    fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;
    fn delete(&self, key: &str) -> StorageResult<()>;
    /// URL under which the object can be fetched by the browser.
    fn url(&self, key: &str) -> StorageResult<String>;
}

/// Rejects empty segments, parent references and absolute keys.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.contains('\\')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Content type served for a stored object, derived from its extension.
pub fn content_type_for(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext) {
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}
