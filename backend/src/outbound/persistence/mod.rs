//! PostgreSQL persistence adapters.
//!
//! `DbPool` hands `diesel-async` connections to repositories; schema changes
//! ship as embedded Diesel migrations applied at startup.

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
