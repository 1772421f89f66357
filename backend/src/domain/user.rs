//! User data model.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifiers are assigned from zero upwards.
    #[error("user id must not be negative")]
    NegativeId,
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not have a single `@` with a local part and a domain.
    #[error("email must be a valid email address")]
    InvalidEmail,
}

/// Store-assigned user identifier.
///
/// Identifiers start at `0` and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        if id < 0 {
            return Err(UserValidationError::NegativeId);
        }
        Ok(Self(id))
    }

    /// Raw numeric value.
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated email address.
///
/// ## Invariants
/// - Trimmed, with casing kept exactly as submitted.
/// - Equality and hashing ignore case, so [`Email::key`] doubles as the
///   uniqueness key.
/// - Exactly one `@` separating a non-empty local part from a non-empty
///   domain without whitespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email {
    address: String,
    key: String,
}

impl Email {
    /// Parse a submitted email address.
    ///
    /// # Examples
    /// ```
    /// use account_service::domain::Email;
    ///
    /// let email = Email::parse("  Kuba@Acme.com ").unwrap();
    /// assert_eq!(email.as_ref(), "Kuba@Acme.com");
    /// assert_eq!(email.key(), "kuba@acme.com");
    /// assert_eq!(email.domain(), "acme.com");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let (local, domain) = trimmed
            .split_once('@')
            .ok_or(UserValidationError::InvalidEmail)?;
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self {
            address: trimmed.to_owned(),
            key: trimmed.to_lowercase(),
        })
    }

    /// Lower-cased address used for lookups and uniqueness.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Lower-cased domain part after the `@`.
    pub fn domain(&self) -> &str {
        self.key
            .split_once('@')
            .map_or(self.key.as_str(), |(_, domain)| domain)
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.address.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.address
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Encoded password hash as produced by a [`PasswordHasher`] adapter.
///
/// `Debug` output is redacted so hashes never reach logs.
///
/// [`PasswordHasher`]: crate::domain::ports::PasswordHasher
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Account data handed to a store for insertion; it has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub lastname: String,
    pub email: Email,
    pub password_hash: PasswordHash,
}

impl NewUser {
    /// Attach the identifier assigned by the store.
    pub fn into_user(self, id: UserId) -> User {
        let Self {
            name,
            lastname,
            email,
            password_hash,
        } = self;
        User {
            id,
            name,
            lastname,
            email,
            password_hash,
        }
    }
}

/// Registered account.
///
/// ## Invariants
/// - `id` is assigned exactly once, by the store, and never changes.
/// - `email` is unique across all users, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    lastname: String,
    email: Email,
    password_hash: PasswordHash,
}

impl User {
    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Given name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Family name.
    pub fn lastname(&self) -> &str {
        self.lastname.as_str()
    }

    /// Email address as registered.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// Public projection of a [`User`]; it never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(example = 0)]
    pub id: i64,
    #[schema(example = "Jakub")]
    pub name: String,
    #[schema(example = "Kaiser")]
    pub lastname: String,
    #[schema(example = "kuba@acme.com")]
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.value(),
            name: user.name.clone(),
            lastname: user.lastname.clone(),
            email: user.email.to_string(),
        }
    }
}
