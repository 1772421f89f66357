//! Account domain: validated value types, ports and the two use cases.
//!
//! Nothing here depends on Actix or Diesel. Adapters reach the services
//! through the traits in [`ports`].
//!
//! Main types:
//! - Error / ErrorCode: API error payload and stable error identifier.
//! - User / NewUser / UserProfile: stored accounts and their public view.
//! - Candidate / ValidationErrors: registration input and its rule failures.
//! - RegistrationService / PasswordLoginService: use-case implementations.

pub mod auth;
pub mod error;
pub mod login;
pub mod ports;
pub mod registration;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError, Principal};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::login::PasswordLoginService;
pub use self::registration::{
    Candidate, DEFAULT_ALLOWED_DOMAIN, EmailDomainPolicy, PASSWORD_MIN_CHARS, RegistrationService,
    ValidatedCandidate, ValidationErrors, Violation,
};
pub use self::trace_id::TraceId;
pub use self::user::{Email, NewUser, PasswordHash, User, UserId, UserProfile, UserValidationError};

