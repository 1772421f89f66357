//! Sign-in input and the identity stored in the session.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{Email, UserId};

/// Why a login payload was refused before any lookup happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Blank email.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email without a usable `local@domain` shape.
    #[error("email must be a valid email address")]
    InvalidEmail,
    /// Empty password.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Email and password submitted to `/login`.
///
/// The email is parsed like a registered one and matched ignoring case. The password is kept
/// byte for byte, surrounding whitespace included, and wiped on drop.
///
/// # Examples
/// ```
/// use account_service::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Kuba@acme.com", "111111111111").unwrap();
/// assert_eq!(creds.email().key(), "kuba@acme.com");
/// assert_eq!(creds.password(), "111111111111");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Check both fields are present and the email parses.
    ///
    /// # Errors
    /// Returns the first [`LoginValidationError`] found, email first.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = match email.trim() {
            "" => return Err(LoginValidationError::EmptyEmail),
            raw => Email::parse(raw).map_err(|_| LoginValidationError::InvalidEmail)?,
        };
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Canonical email to look up.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password to verify.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Who the session belongs to. Never contains the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Account identifier.
    #[schema(value_type = i64, example = 0)]
    pub id: UserId,
    /// Canonical account email.
    #[schema(value_type = String, example = "kuba@acme.com")]
    pub email: Email,
}
