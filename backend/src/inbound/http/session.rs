//! Typed access to the cookie session.
//!
//! Handlers see a [`Principal`] or nothing; the storage key and cookie
//! handling stay in this module.

use actix_session::{Session, SessionGetError};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Principal};

pub(crate) const PRINCIPAL_KEY: &str = "principal";

/// Actix session viewed as the slot holding the signed-in principal.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `principal` as signed in under a fresh session id.
    ///
    /// # Errors
    /// Returns an internal error when the principal cannot be serialised.
    pub fn persist_principal(&self, principal: &Principal) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(PRINCIPAL_KEY, principal)
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))
    }

    /// Signed-in principal, if any.
    ///
    /// An unreadable entry counts as signed out.
    #[must_use]
    pub fn principal(&self) -> Option<Principal> {
        self.0
            .get::<Principal>(PRINCIPAL_KEY)
            .unwrap_or_else(|err: SessionGetError| {
                warn!(error = %err, "discarding unreadable session principal");
                None
            })
    }

    /// Signed-in principal, or an unauthorised error.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::Unauthorized`] when nobody is
    /// signed in.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Forget the session and expire its cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { Ok(Self::new(session.await?)) })
    }
}
