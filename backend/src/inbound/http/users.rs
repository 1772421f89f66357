//! Registration API handler.
//!
//! ```text
//! POST /register {"name":"Jakub","lastname":"Kaiser","email":"kuba@acme.com","password":"111111111111"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::{RegistrationError, UserPersistenceError};
use crate::domain::{Candidate, Error, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /register`.
///
/// Absent fields decode as empty strings so they are reported by the field
/// rules rather than rejected as malformed JSON.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "Jakub")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Kaiser")]
    pub lastname: String,
    #[serde(default)]
    #[schema(example = "kuba@acme.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "111111111111", min_length = 12)]
    pub password: String,
}

impl From<RegisterRequest> for Candidate {
    fn from(value: RegisterRequest) -> Self {
        Self {
            name: value.name,
            lastname: value.lastname,
            email: value.email,
            password: Zeroizing::new(value.password),
        }
    }
}

fn map_registration_error(err: RegistrationError) -> Error {
    match err {
        RegistrationError::Validation(errors) => Error::validation(errors.messages()),
        RegistrationError::AlreadyExists { message } => Error::user_exists(message),
        RegistrationError::Persistence(UserPersistenceError::Connection { message }) => {
            warn!(%message, "user store unavailable");
            Error::service_unavailable("user store is unavailable")
        }
        RegistrationError::Persistence(other) => Error::internal(other.to_string()),
        RegistrationError::Hashing(other) => Error::internal(other.to_string()),
    }
}

/// Register a new account.
///
/// Every field rule is checked and all violations are returned together in
/// `errors`. The response never includes the password.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = UserProfile),
        (status = 400, description = "Invalid body, failed validation, or email already registered", body = Error),
        (status = 503, description = "User store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let user = state
        .registration
        .register(payload.into_inner().into())
        .await
        .map_err(map_registration_error)?;
    Ok(web::Json(UserProfile::from(&user)))
}
