//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing store, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Principal};

/// Message returned for any failed credential check.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated principal.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error>;

    /// Re-read a session principal from the store.
    ///
    /// Returns `Ok(None)` once the account no longer exists.
    async fn refresh(&self, principal: &Principal) -> Result<Option<Principal>, Error>;
}
