//! Builders for HTTP state ports backed by the configured user store.

use std::sync::Arc;

use actix_web::web;

use account_service::domain::ports::{LoginService, PasswordHasher, UserRegistration, UserRepository};
use account_service::domain::{EmailDomainPolicy, PasswordLoginService, RegistrationService};
use account_service::inbound::http::state::HttpState;
use account_service::outbound::memory::InMemoryUserRepository;
use account_service::outbound::persistence::DieselUserRepository;
use account_service::outbound::security::Argon2PasswordHasher;
use tracing::{info, warn};

use super::ServerConfig;

/// Wire registration and login services over one repository and hasher.
fn build_services<R, H>(
    repository: Arc<R>,
    hasher: Arc<H>,
    policy: EmailDomainPolicy,
) -> (Arc<dyn UserRegistration>, Arc<dyn LoginService>)
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    let registration = RegistrationService::new(repository.clone(), hasher.clone(), policy);
    let login = PasswordLoginService::new(repository, hasher);
    (Arc::new(registration), Arc::new(login))
}

/// Build HTTP state using the database when a pool is configured, otherwise
/// an in-memory store that lasts for the lifetime of the process.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let policy = config.email_policy.clone();

    let (registration, login) = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL user store");
            build_services(
                Arc::new(DieselUserRepository::new(pool.clone())),
                hasher,
                policy,
            )
        }
        None => {
            warn!("no database configured; users are kept in memory");
            build_services(Arc::new(InMemoryUserRepository::new()), hasher, policy)
        }
    };

    web::Data::new(HttpState::new(registration, login))
}
