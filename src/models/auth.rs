//! Request extractor for the signed-in dashboard user.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use serde::Serialize;

use crate::domain::user::SessionClaims;
use crate::models::config::ServerConfig;
use crate::services::auth::decode_session_token;

/// User resolved from the identity cookie.
///
/// Extraction fails with `401 Unauthorized` when the identity is missing, the
/// token signature does not verify, or the token has expired.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            sub: claims.sub,
            email: claims.email,
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let token = identity
        .id()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorUnauthorized("server configuration unavailable"))?;

    decode_session_token(&token, &config.secret)
        .map(AuthenticatedUser::from)
        .map_err(|err| {
            log::warn!("Rejected session token: {err}");
            ErrorUnauthorized("invalid session")
        })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
