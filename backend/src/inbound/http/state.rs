//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! domain driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, UserRegistration};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// `POST /register` use case.
    pub registration: Arc<dyn UserRegistration>,
    /// Credential checks for `/login` and session refresh for `/auth`.
    pub login: Arc<dyn LoginService>,
}

impl HttpState {
    /// Bundle the driving ports handed to every worker.
    pub fn new(registration: Arc<dyn UserRegistration>, login: Arc<dyn LoginService>) -> Self {
        Self {
            registration,
            login,
        }
    }
}
