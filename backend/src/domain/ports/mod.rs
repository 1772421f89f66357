//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`UserRepository`, `PasswordHasher`) are implemented by
//! outbound adapters. Driving ports (`UserRegistration`, `LoginService`) are
//! what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod user_registration;
mod user_repository;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{INVALID_CREDENTIALS_MESSAGE, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub(crate) use password_hasher::on_blocking_pool;
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::{RegistrationError, USER_EXISTS_MESSAGE, UserRegistration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
