//! Port abstraction for password hashing.
use std::sync::Arc;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hash could not be computed.
        Hash { message: String } => "password hashing failed: {message}",
        /// Stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Driven port that derives and checks password hashes.
///
/// Implementations are CPU bound; async callers should move calls onto the
/// blocking pool.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Derive an encoded hash for `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against a previously derived hash.
    ///
    /// A mismatch is `Ok(false)`; errors are reserved for unusable hashes.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}

/// Run a hasher operation on the blocking thread pool.
pub(crate) async fn on_blocking_pool<H, T, F>(hasher: &Arc<H>, op: F) -> Result<T, PasswordHashError>
where
    H: PasswordHasher + ?Sized + 'static,
    T: Send + 'static,
    F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || op(hasher.as_ref()))
        .await
        .map_err(|err| PasswordHashError::hash(format!("hashing task failed: {err}")))?
}
