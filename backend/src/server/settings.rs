//! Application settings loaded via OrthoConfig.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};

use account_service::domain::EmailDomainPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised when a configured value cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not an `ip:port` pair.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Process-wide settings for the account service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNT")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without one, users live in memory.
    pub database_url: Option<String>,
    /// Email domains allowed to register, as a list or a comma-separated
    /// string. An empty value allows every domain.
    #[serde(default, deserialize_with = "domain_list")]
    pub allowed_email_domains: Option<Vec<String>>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

/// A single env value arrives as a string; comma lists arrive split.
#[derive(Deserialize)]
#[serde(untagged)]
enum DomainList {
    One(String),
    Many(Vec<String>),
}

fn domain_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Option::<DomainList>::deserialize(deserializer)?;
    Ok(list.map(|list| match list {
        DomainList::One(value) => value.split(',').map(str::to_owned).collect(),
        DomainList::Many(values) => values,
    }))
}

impl AppSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.trim().parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Registration domain policy.
    pub fn email_policy(&self) -> EmailDomainPolicy {
        self.allowed_email_domains
            .as_ref()
            .map_or_else(EmailDomainPolicy::default, EmailDomainPolicy::new)
    }

    /// Pool size for the PostgreSQL store, `10` unless configured.
    pub const fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }
}
