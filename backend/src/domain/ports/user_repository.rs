//! Account storage port.

use async_trait::async_trait;

use crate::domain::{Email, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Storage failures, as seen by the domain.
    pub enum UserPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// The store was reached but the statement failed.
        Query { message: String } => "user repository query failed: {message}",
        /// Insert collided with an existing canonical email.
        DuplicateEmail { email: String } => "user with email {email} already exists",
    }
}

/// Driven port for the account store.
///
/// Adapters must enforce email uniqueness on [`UserRepository::insert`]
/// and report a collision as [`UserPersistenceError::DuplicateEmail`]
/// without mutating the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by canonical email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Persist a new user and return it with its assigned identifier.
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
