//! Rendering of domain [`Error`] values as HTTP responses.
//!
//! The body is the serialised error envelope. Server-side failures keep
//! their code and trace id but lose their message, which is logged instead.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result type returned by HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest | ErrorCode::UserExists => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(trace_id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, trace_id.to_owned()));
        }
        if self.code() != ErrorCode::InternalError {
            return response.json(self);
        }

        error!(trace_id = self.trace_id(), message = self.message(), "internal error");
        let public = match self.trace_id() {
            Some(trace_id) => Error::internal(REDACTED_MESSAGE).with_trace_id(trace_id.to_owned()),
            None => Error::internal(REDACTED_MESSAGE),
        };
        response.json(public)
    }
}

/// Fallback service: unmatched routes answer with a `not_found` envelope.
pub async fn route_not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!(
        "no route for {} {}",
        req.method(),
        req.path()
    )))
}

/// Framework errors reaching a handler boundary are opaque to clients.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error promoted to internal error");
        Self::internal(REDACTED_MESSAGE)
    }
}
