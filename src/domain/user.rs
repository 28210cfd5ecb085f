use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{UserEmail, UserId};

/// Account allowed to sign in to the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: UserEmail,
    /// PHC-formatted Argon2 hash.
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: UserEmail,
    pub password_hash: String,
}

/// Claims carried by the signed session token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}
