//! Account service library: user registration and session login over HTTP.
//!
//! The crate follows a hexagonal layout. `domain` holds entities, field
//! rules, ports and use-case services; `inbound::http` adapts them to
//! Actix handlers; `outbound` supplies stores and password hashing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
