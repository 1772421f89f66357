//! Registration use-case: field rules, the email domain policy, and the
//! service that stores accepted candidates.

mod email_policy;
mod service;
mod validation;

pub use email_policy::{DEFAULT_ALLOWED_DOMAIN, EmailDomainPolicy};
pub use service::RegistrationService;
pub use validation::{
    Candidate, PASSWORD_MIN_CHARS, ValidatedCandidate, ValidationErrors, Violation,
};
