//! Field rules for registration candidates.
//!
//! Every rule is evaluated; violations are collected in field-declaration
//! order (`name`, `lastname`, `email`, `password`) so clients see the full
//! list in one response.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{Email, NewUser, PasswordHash};

use super::EmailDomainPolicy;

/// Minimum password length, counted in Unicode scalar values.
pub const PASSWORD_MIN_CHARS: usize = 12;

/// A single broken field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `name` is blank.
    EmptyName,
    /// `lastname` is blank.
    EmptyLastname,
    /// `email` does not parse as an address.
    InvalidEmail,
    /// The email domain is outside the policy; `allowed` lists the domains.
    DisallowedEmailDomain { allowed: String },
    /// `password` has fewer than `min` characters.
    PasswordTooShort { min: usize },
}

impl Violation {
    /// Field the rule applies to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyLastname => "lastname",
            Self::InvalidEmail | Self::DisallowedEmailDomain { .. } => "email",
            Self::PasswordTooShort { .. } => "password",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyLastname => write!(f, "lastname must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::DisallowedEmailDomain { allowed } => {
                write!(f, "email domain must be one of: {allowed}")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters long")
            }
        }
    }
}

/// Non-empty, ordered set of violations for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    /// Violations in field order.
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Human-readable messages in field order.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Unvalidated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

impl Candidate {
    /// Convenience constructor from borrowed parts.
    pub fn new(name: &str, lastname: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_owned(),
            lastname: lastname.to_owned(),
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    /// Check every field rule.
    ///
    /// Blank (whitespace-only) names count as empty. Names are kept as
    /// submitted; the email is trimmed and keeps its casing.
    ///
    /// # Examples
    /// ```
    /// use account_service::domain::{Candidate, EmailDomainPolicy};
    ///
    /// let candidate = Candidate::new("", "Kaiser", "kuba@acme.com", "123");
    /// let errors = candidate.validate(&EmailDomainPolicy::default()).unwrap_err();
    /// assert_eq!(
    ///     errors.messages(),
    ///     ["name must not be empty", "Password must be at least 12 characters long"]
    /// );
    /// ```
    pub fn validate(self, policy: &EmailDomainPolicy) -> Result<ValidatedCandidate, ValidationErrors> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(Violation::EmptyName);
        }
        if self.lastname.trim().is_empty() {
            violations.push(Violation::EmptyLastname);
        }
        let email = match Email::parse(&self.email) {
            Ok(email) if policy.allows(&email) => Some(email),
            Ok(_) => {
                violations.push(Violation::DisallowedEmailDomain {
                    allowed: policy.describe(),
                });
                None
            }
            Err(_) => {
                violations.push(Violation::InvalidEmail);
                None
            }
        };
        if self.password.chars().count() < PASSWORD_MIN_CHARS {
            violations.push(Violation::PasswordTooShort {
                min: PASSWORD_MIN_CHARS,
            });
        }

        match email {
            Some(email) if violations.is_empty() => Ok(ValidatedCandidate {
                name: self.name,
                lastname: self.lastname,
                email,
                password: self.password,
            }),
            _ => Err(ValidationErrors(violations)),
        }
    }
}

/// Candidate that passed every field rule.
///
/// Only [`Candidate::validate`] can build one, so the registration service
/// cannot be handed unchecked input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCandidate {
    name: String,
    lastname: String,
    email: Email,
    password: Zeroizing<String>,
}

impl ValidatedCandidate {
    /// Parsed email; its key drives the duplicate check.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plain-text password, only to be handed to a hasher.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Combine with the hashed password for insertion.
    pub fn into_new_user(self, password_hash: PasswordHash) -> NewUser {
        NewUser {
            name: self.name,
            lastname: self.lastname,
            email: self.email,
            password_hash,
        }
    }
}
