//! Session gate: password sign-in and signed session tokens.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use validator::Validate;

use crate::domain::types::UserEmail;
use crate::domain::user::{NewUser, SessionClaims, User};
use crate::forms::auth::SignInForm;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// The only message shown for a failed sign-in, whatever the cause.
pub const SIGN_IN_FAILED: &str = "Credenciales incorrectas";

pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
}

/// Returns `false` for a wrong password and for an unreadable hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is malformed: {e}");
            false
        }
    }
}

pub fn issue_session_token(
    user: &User,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> ServiceResult<String> {
    let exp = usize::try_from((now + ttl).timestamp())
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    let claims = SessionClaims {
        sub: user.id.get().to_string(),
        email: user.email.as_str().to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServiceError::Internal(format!("failed to sign session token: {e}")))
}

/// Verifies signature and expiry of a token issued by [`issue_session_token`].
pub fn decode_session_token(token: &str, secret: &str) -> ServiceResult<SessionClaims> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Session token rejected: {e}");
        ServiceError::Unauthorized
    })
}

/// Exchanges credentials for a session token.
///
/// Every failure, including storage errors, is reported as
/// [`ServiceError::InvalidCredentials`]; the cause is only logged.
pub fn sign_in<R>(
    repo: &R,
    form: &SignInForm,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> ServiceResult<String>
where
    R: UserReader + ?Sized,
{
    let user = authenticate(repo, form).map_err(|err| {
        log::warn!("Sign-in failed: {err}");
        ServiceError::InvalidCredentials
    })?;

    log::info!("User {} signed in", user.email);
    issue_session_token(&user, secret, ttl, now)
}

fn authenticate<R>(repo: &R, form: &SignInForm) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    form.validate()
        .map_err(|e| ServiceError::Form(e.to_string()))?;
    let email = form.email()?;

    let user = repo
        .get_user_by_email(&email)?
        .ok_or(ServiceError::NotFound)?;

    if verify_password(&form.password, &user.password_hash) {
        Ok(user)
    } else {
        Err(ServiceError::InvalidCredentials)
    }
}

/// Registers a sign-in account with a freshly hashed password.
pub fn create_account<R>(repo: &R, email: &str, password: &str) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let email = UserEmail::new(email)?;
    if password.is_empty() {
        return Err(ServiceError::Form("password cannot be empty".to_string()));
    }
    if repo.get_user_by_email(&email)?.is_some() {
        return Err(ServiceError::Form(format!("{email} already exists")));
    }

    let new_user = NewUser {
        email,
        password_hash: hash_password(password)?,
    };
    Ok(repo.create_user(&new_user)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::UserId;

    const SECRET: &str = "test-secret-with-enough-entropy";

    fn user(password: &str) -> User {
        User {
            id: UserId::new(7).unwrap(),
            email: UserEmail::new("admin@compina.pe").unwrap(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not a phc string"));
    }

    #[test]
    fn issued_token_decodes_to_the_user() {
        let token = issue_session_token(&user("x"), SECRET, Duration::hours(1), Utc::now()).unwrap();
        let claims = decode_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "admin@compina.pe");
    }

    #[test]
    fn token_with_wrong_secret_or_expired_is_rejected() {
        let token = issue_session_token(&user("x"), SECRET, Duration::hours(1), Utc::now()).unwrap();
        assert!(matches!(
            decode_session_token(&token, "other-secret"),
            Err(ServiceError::Unauthorized)
        ));

        let stale = issue_session_token(
            &user("x"),
            SECRET,
            Duration::hours(1),
            Utc::now() - Duration::hours(3),
        )
        .unwrap();
        assert!(matches!(
            decode_session_token(&stale, SECRET),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[cfg(feature = "test-mocks")]
    mod with_mocks {
        use super::*;
        use crate::repository::errors::RepositoryError;
        use crate::repository::mock::MockRepository;

        fn form(email: &str, password: &str) -> SignInForm {
            SignInForm {
                email: email.into(),
                password: password.into(),
            }
        }

        #[test]
        fn sign_in_returns_a_token_for_valid_credentials() {
            let stored = user("correct horse");
            let mut repo = MockRepository::new();
            repo.expect_get_user_by_email()
                .returning(move |_| Ok(Some(stored.clone())));

            let token = sign_in(
                &repo,
                &form("admin@compina.pe", "correct horse"),
                SECRET,
                Duration::hours(1),
                Utc::now(),
            )
            .unwrap();
            assert_eq!(decode_session_token(&token, SECRET).unwrap().sub, "7");
        }

        #[test]
        fn every_failure_collapses_to_invalid_credentials() {
            let stored = user("correct horse");
            let mut wrong_password = MockRepository::new();
            wrong_password
                .expect_get_user_by_email()
                .returning(move |_| Ok(Some(stored.clone())));

            let mut unknown_user = MockRepository::new();
            unknown_user
                .expect_get_user_by_email()
                .returning(|_| Ok(None));

            let mut broken_store = MockRepository::new();
            broken_store
                .expect_get_user_by_email()
                .returning(|_| Err(RepositoryError::ConnectionError("down".into())));

            let untouched = MockRepository::new();

            let cases: [(&MockRepository, SignInForm); 4] = [
                (&wrong_password, form("admin@compina.pe", "wrong")),
                (&unknown_user, form("nobody@compina.pe", "x")),
                (&broken_store, form("admin@compina.pe", "x")),
                (&untouched, form("not-an-email", "x")),
            ];
            for (repo, form) in cases {
                assert!(matches!(
                    sign_in(repo, &form, SECRET, Duration::hours(1), Utc::now()),
                    Err(ServiceError::InvalidCredentials)
                ));
            }
        }

        #[test]
        fn create_account_rejects_duplicates() {
            let stored = user("x");
            let mut repo = MockRepository::new();
            repo.expect_get_user_by_email()
                .returning(move |_| Ok(Some(stored.clone())));
            repo.expect_create_user().never();

            assert!(matches!(
                create_account(&repo, "admin@compina.pe", "pw"),
                Err(ServiceError::Form(_))
            ));
        }
    }
}
