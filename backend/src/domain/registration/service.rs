//! Registration service orchestrating validation, duplicate detection, and
//! persistence.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};
use zeroize::Zeroizing;

use crate::domain::User;
use crate::domain::ports::{
    PasswordHasher, RegistrationError, UserPersistenceError, UserRegistration, UserRepository,
    on_blocking_pool,
};

use super::{Candidate, EmailDomainPolicy};

/// Registration service implementing the [`UserRegistration`] driving port.
///
/// A candidate that fails validation never reaches the repository. The
/// duplicate check runs before hashing; a uniqueness violation raised by
/// the store during insert is reported the same way, so concurrent
/// registrations for one email yield exactly one stored user when the
/// store enforces uniqueness.
pub struct RegistrationService<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
    policy: EmailDomainPolicy,
}

impl<R, H> RegistrationService<R, H> {
    /// Create a new service over the given store and hasher.
    pub fn new(repository: Arc<R>, hasher: Arc<H>, policy: EmailDomainPolicy) -> Self {
        Self {
            repository,
            hasher,
            policy,
        }
    }

    /// Email domain policy applied to candidates.
    pub fn policy(&self) -> &EmailDomainPolicy {
        &self.policy
    }
}

fn log_persistence_failure(stage: &'static str, err: &UserPersistenceError) {
    if !matches!(err, UserPersistenceError::DuplicateEmail { .. }) {
        error!(stage, error = %err, "user store failed during registration");
    }
}

#[async_trait]
impl<R, H> UserRegistration for RegistrationService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, candidate: Candidate) -> Result<User, RegistrationError> {
        let validated = candidate.validate(&self.policy).inspect_err(|errors| {
            debug!(violations = errors.violations().len(), "registration failed validation");
        })?;

        let existing = self
            .repository
            .find_by_email(validated.email())
            .await
            .inspect_err(|err| log_persistence_failure("lookup", err))?;
        if existing.is_some() {
            debug!("registration rejected: email already registered");
            return Err(RegistrationError::already_exists());
        }

        let password = Zeroizing::new(validated.password().to_owned());
        let hash = on_blocking_pool(&self.hasher, move |hasher| hasher.hash(&password))
            .await
            .inspect_err(|err| error!(error = %err, "password hashing failed"))?;

        let user = self
            .repository
            .insert(validated.into_new_user(hash))
            .await
            .inspect_err(|err| match err {
                UserPersistenceError::DuplicateEmail { .. } => {
                    debug!("registration lost insert race for existing email");
                }
                other => log_persistence_failure("insert", other),
            })?;

        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}
