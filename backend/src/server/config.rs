//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use account_service::domain::EmailDomainPolicy;
use account_service::outbound::persistence::DbPool;
use actix_web::cookie::{Key, SameSite};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) email_policy: EmailDomainPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration using session preferences.
    ///
    /// The registration domain policy starts as the default allow-list.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            email_policy: EmailDomainPolicy::default(),
            db_pool: None,
        }
    }

    /// Replace the registration email domain policy.
    #[must_use]
    pub fn with_email_policy(mut self, policy: EmailDomainPolicy) -> Self {
        self.email_policy = policy;
        self
    }

    /// Attach a database connection pool.
    ///
    /// When provided, users are stored in PostgreSQL; otherwise the server
    /// keeps them in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
