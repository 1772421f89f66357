//! Shared pool of async PostgreSQL connections.
//!
//! Connections open lazily; a checkout that waits longer than the timeout
//! fails with [`PoolError::Checkout`].

use std::fmt;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::domain::ports::define_port_error;

const DEFAULT_MAX_SIZE: u32 = 10;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

define_port_error! {
    /// Pool construction or checkout failure.
    pub enum PoolError {
        /// No connection was handed out in time.
        Checkout { message: String } => "failed to get connection from pool: {message}",
        /// bb8 rejected the pool settings.
        Build { message: String } => "failed to build connection pool: {message}",
    }
}

/// Where to connect and how many connections to keep.
#[derive(Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Ten connections and a five second checkout timeout.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            checkout_timeout: CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the pool size; zero is raised to one.
    #[must_use]
    pub fn with_max_size(self, max_size: u32) -> Self {
        Self {
            max_size: max_size.max(1),
            ..self
        }
    }
}

// The URL usually embeds a password.
impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("database_url", &"<redacted>")
            .field("max_size", &self.max_size)
            .field("checkout_timeout", &self.checkout_timeout)
            .finish()
    }
}

/// Cloneable handle to the bb8 pool.
#[derive(Clone)]
pub struct DbPool(Pool<AsyncPgConnection>);

impl DbPool {
    /// Build the pool without opening any connection yet.
    ///
    /// # Errors
    /// Returns [`PoolError::Build`] when bb8 rejects the settings.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map(Self)
            .map_err(|err| PoolError::build(err.to_string()))
    }

    /// Borrow a connection until the guard drops.
    ///
    /// # Errors
    /// Returns [`PoolError::Checkout`] on timeout or when the database
    /// refuses the connection.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.0
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
