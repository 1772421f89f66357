//! JSON body extraction settings.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Message returned for any body that cannot be decoded.
pub const INVALID_BODY_MESSAGE: &str = "request body must be a JSON object";

/// Upper bound on accepted JSON bodies.
pub const JSON_BODY_LIMIT: usize = 16 * 1024;

/// `JsonConfig` that reports empty, malformed, oversized, or mistyped
/// bodies as `400 invalid_request` in the standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected request body");
    let reason = match &err {
        JsonPayloadError::ContentType => "content type must be application/json",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "body is too large"
        }
        _ => "body could not be parsed",
    };
    Error::invalid_request(INVALID_BODY_MESSAGE)
        .with_details(json!({ "reason": reason }))
        .into()
}
