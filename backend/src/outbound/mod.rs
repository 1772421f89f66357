//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed user store using Diesel ORM
//! - **memory**: in-process user store used when no database is configured
//! - **security**: Argon2id password hashing
//!
//! Adapters translate between domain types and infrastructure-specific
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
