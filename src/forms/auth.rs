use serde::Deserialize;
use validator::Validate;

use crate::domain::types::UserEmail;
use crate::forms::FormError;

/// Credentials posted by the sign-in page.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl SignInForm {
    pub fn email(&self) -> Result<UserEmail, FormError> {
        UserEmail::new(self.email.as_str()).map_err(|_| FormError::InvalidEmail)
    }
}
