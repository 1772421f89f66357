//! Password login over the user store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};
use zeroize::Zeroizing;

use crate::domain::ports::{
    INVALID_CREDENTIALS_MESSAGE, LoginService, PasswordHasher, UserPersistenceError,
    UserRepository, on_blocking_pool,
};
use crate::domain::{Error, LoginCredentials, Principal};

/// [`LoginService`] that checks credentials against stored password hashes.
///
/// Unknown emails and wrong passwords produce the same `401` so callers
/// cannot probe which accounts exist.
pub struct PasswordLoginService<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> PasswordLoginService<R, H> {
    /// Create a login service over the given store and hasher.
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }
}

fn map_persistence_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "user store failed during login");
    match err {
        UserPersistenceError::Connection { .. } => {
            Error::service_unavailable("user store is unavailable")
        }
        other => Error::internal(other.to_string()),
    }
}

#[async_trait]
impl<R, H> LoginService for PasswordLoginService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let Some(user) = self
            .repository
            .find_by_email(credentials.email())
            .await
            .map_err(map_persistence_error)?
        else {
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let stored = user.password_hash().clone();
        let verified = on_blocking_pool(&self.hasher, move |hasher| {
            hasher.verify(&password, &stored)
        })
        .await
        .map_err(|err| {
            error!(user_id = %user.id(), error = %err, "password verification failed");
            Error::internal(err.to_string())
        })?;

        if !verified {
            debug!(user_id = %user.id(), "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        Ok(Principal {
            id: user.id(),
            email: user.email().clone(),
        })
    }

    async fn refresh(&self, principal: &Principal) -> Result<Option<Principal>, Error> {
        let user = self
            .repository
            .find_by_id(principal.id)
            .await
            .map_err(map_persistence_error)?;
        if user.is_none() {
            debug!(user_id = %principal.id, "session names a missing account");
        }
        Ok(user.map(|user| Principal {
            id: user.id(),
            email: user.email().clone(),
        }))
    }
}
