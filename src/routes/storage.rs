use actix_web::{HttpResponse, Responder, get, web};

use crate::models::auth::AuthenticatedUser;
use crate::storage::fs::FsBlobStore;
use crate::storage::{BlobStore, StorageError, content_type_for};

/// Serves a stored object at the URL handed out by [`BlobStore::url`].
#[get("/storage/{key:.*}")]
pub async fn serve_object(
    key: web::Path<String>,
    _user: AuthenticatedUser,
    store: web::Data<FsBlobStore>,
) -> impl Responder {
    let key = key.into_inner();
    match store.download(&key) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(content_type_for(&key))
            .body(bytes),
        Err(StorageError::NotFound(_) | StorageError::InvalidKey(_)) => {
            HttpResponse::NotFound().finish()
        }
        Err(err) => {
            log::error!("Failed to read stored object {key}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
