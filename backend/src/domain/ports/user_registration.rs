//! Driving port for the registration use-case.
//!
//! Inbound adapters submit an unvalidated [`Candidate`] and receive either
//! the stored [`User`] or a [`RegistrationError`] whose variants tell the
//! boundary which response to produce.

use async_trait::async_trait;

use crate::domain::{Candidate, User, ValidationErrors};

use super::{PasswordHashError, UserPersistenceError};

/// Message carried by [`RegistrationError::AlreadyExists`].
pub const USER_EXISTS_MESSAGE: &str = "User exists";

/// Outcome of a rejected registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// One or more field rules failed; nothing was stored.
    #[error("registration rejected: {0}")]
    Validation(ValidationErrors),
    /// A user with the same email is already registered.
    #[error("{message}")]
    AlreadyExists { message: String },
    /// The store failed.
    #[error(transparent)]
    Persistence(UserPersistenceError),
    /// Password hashing failed.
    #[error(transparent)]
    Hashing(PasswordHashError),
}

impl RegistrationError {
    /// Duplicate-email rejection with the standard message.
    pub fn already_exists() -> Self {
        Self::AlreadyExists {
            message: USER_EXISTS_MESSAGE.to_owned(),
        }
    }
}

impl From<ValidationErrors> for RegistrationError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<PasswordHashError> for RegistrationError {
    fn from(value: PasswordHashError) -> Self {
        Self::Hashing(value)
    }
}

impl From<UserPersistenceError> for RegistrationError {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::DuplicateEmail { .. } => Self::already_exists(),
            other => Self::Persistence(other),
        }
    }
}

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Validate `candidate`, reject duplicates, and store the new user.
    async fn register(&self, candidate: Candidate) -> Result<User, RegistrationError>;
}
