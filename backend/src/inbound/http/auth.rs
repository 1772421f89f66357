//! Session authentication handlers.
//!
//! ```text
//! POST /login {"email":"kuba@acme.com","password":"111111111111"}
//! GET /auth
//! POST /logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, LoginCredentials, LoginValidationError, Principal};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body of `POST /login`. Absent fields read as empty strings.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Account email, matched case-insensitively.
    #[serde(default)]
    #[schema(example = "kuba@acme.com")]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    #[schema(example = "111111111111")]
    pub password: String,
}

impl LoginRequest {
    /// Validate the body, reporting the offending field in `details`.
    fn credentials(&self) -> Result<LoginCredentials, Error> {
        LoginCredentials::try_from_parts(&self.email, &self.password).map_err(|err| {
            let (field, code) = match err {
                LoginValidationError::EmptyEmail => ("email", "empty_email"),
                LoginValidationError::InvalidEmail => ("email", "invalid_email"),
                LoginValidationError::EmptyPassword => ("password", "empty_password"),
            };
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": field, "code": code }))
        })
    }
}

/// Check a password and bind the account to a fresh session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = Principal, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<Principal>> {
    let credentials = payload.credentials()?;
    let principal = state.login.authenticate(&credentials).await?;
    session.persist_principal(&principal)?;
    info!(user_id = %principal.id, "session opened");
    Ok(web::Json(principal))
}

/// Drop the session cookie. Succeeds whether or not anyone was signed in.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Who is signed in on this session.
///
/// The principal is re-read from the store; a session naming a deleted
/// account is purged and treated as signed out.
#[utoipa::path(
    get,
    path = "/auth",
    responses(
        (status = 200, description = "Caller is authenticated", body = Principal),
        (status = 401, description = "Caller is not authenticated", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "checkAuth"
)]
#[get("/auth")]
pub async fn check_auth(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Principal>> {
    let principal = session.require_principal()?;
    let Some(current) = state.login.refresh(&principal).await? else {
        info!(user_id = %principal.id, "session closed: account no longer exists");
        session.purge();
        return Err(Error::unauthorized("login required"));
    };
    Ok(web::Json(current))
}
