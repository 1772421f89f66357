//! Permitted email domains for new registrations.

use std::collections::BTreeSet;

use crate::domain::Email;

/// Domain accepted when no policy is configured.
pub const DEFAULT_ALLOWED_DOMAIN: &str = "acme.com";

/// Allow-list of email domains that may register.
///
/// Matching is exact and case-insensitive on the part after `@`; subdomains
/// must be listed explicitly. An empty policy admits every domain.
///
/// # Examples
/// ```
/// use account_service::domain::{Email, EmailDomainPolicy};
///
/// let policy = EmailDomainPolicy::from_list("acme.com, example.org");
/// assert!(policy.allows(&Email::parse("kuba@ACME.com").unwrap()));
/// assert!(!policy.allows(&Email::parse("kuba@gmail.com").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDomainPolicy {
    allowed: BTreeSet<String>,
}

impl EmailDomainPolicy {
    /// Build a policy from individual domains. Blank entries are ignored.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = domains
            .into_iter()
            .map(|domain| domain.as_ref().trim().trim_start_matches('@').to_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();
        Self { allowed }
    }

    /// Parse a comma-separated domain list.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Policy without domain restrictions.
    pub fn allow_all() -> Self {
        Self {
            allowed: BTreeSet::new(),
        }
    }

    /// Whether the email's domain may register.
    pub fn allows(&self, email: &Email) -> bool {
        self.allowed.is_empty() || self.allowed.contains(email.domain())
    }

    /// Allowed domains in sorted order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }

    pub(crate) fn describe(&self) -> String {
        self.domains().collect::<Vec<_>>().join(", ")
    }
}

impl Default for EmailDomainPolicy {
    fn default() -> Self {
        Self::new([DEFAULT_ALLOWED_DOMAIN])
    }
}
