//! Failure envelope shared by every adapter.
//!
//! An [`Error`] knows nothing about HTTP. The inbound layer picks a status
//! from its [`ErrorCode`] and serialises the rest as the response body.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::TraceId;

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category, serialised in snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed body or broken field rules.
    InvalidRequest,
    /// The submitted email already belongs to an account.
    UserExists,
    /// Missing or rejected credentials.
    Unauthorized,
    /// The addressed resource does not exist.
    NotFound,
    /// A backing store could not be reached.
    ServiceUnavailable,
    /// Anything the caller cannot fix.
    InternalError,
}

/// Error envelope returned to clients.
///
/// `message` is never blank. `errors` carries the broken field rules in the
/// order they were checked and disappears from the JSON when empty, as do
/// `traceId` and `details` when unset.
///
/// # Examples
/// ```
/// use account_service::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", try_from = "WireError", into = "WireError")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "request validation failed")]
    message: String,
    #[schema(example = "3f0b9a52-1c44-4d8e-a1f2-6b7c9d0e5a13")]
    trace_id: Option<String>,
    details: Option<Value>,
    #[schema(example = json!(["name must not be empty"]))]
    errors: Vec<String>,
}

/// Reasons an [`Error`] cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// A trace id was present but blank.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

macro_rules! coded_constructors {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            #[doc = concat!("Error with code [`ErrorCode::", stringify!($code), "`].")]
            #[must_use]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl Error {
    /// Build an error from a message known to be non-blank.
    ///
    /// # Panics
    /// Panics when `message` is blank. Call sites pass literals, so this
    /// marks a programming mistake rather than bad input.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|err| panic!("invalid error envelope: {err}"))
    }

    /// Build an error, tagging it with the active trace id.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
            errors: Vec::new(),
        })
    }

    coded_constructors! {
        invalid_request => InvalidRequest,
        user_exists => UserExists,
        unauthorized => Unauthorized,
        not_found => NotFound,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    /// Rejection listing every broken registration rule.
    ///
    /// # Examples
    /// ```
    /// use account_service::domain::{Error, ErrorCode};
    ///
    /// let err = Error::validation(vec!["name must not be empty".to_owned()]);
    /// assert_eq!(err.code(), ErrorCode::InvalidRequest);
    /// assert_eq!(err.errors(), ["name must not be empty"]);
    /// ```
    #[must_use]
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::invalid_request("request validation failed")
        }
    }

    /// Failure category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable summary.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Trace id captured on construction.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured context, if attached.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Broken field rules, in check order.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Attach machine-readable context.
    ///
    /// # Examples
    /// ```
    /// use account_service::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "email" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(self, details: Value) -> Self {
        Self {
            details: Some(details),
            ..self
        }
    }

    /// Replace the trace id.
    #[must_use]
    pub fn with_trace_id(self, trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(trace_id.into()),
            ..self
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// JSON shape of [`Error`]; deserialising goes through validation.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct WireError {
    code: ErrorCode,
    message: String,
    #[serde(default, alias = "trace_id", skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl From<Error> for WireError {
    fn from(err: Error) -> Self {
        let Error {
            code,
            message,
            trace_id,
            details,
            errors,
        } = err;
        Self {
            code,
            message,
            trace_id,
            details,
            errors,
        }
    }
}

impl TryFrom<WireError> for Error {
    type Error = ErrorValidationError;

    fn try_from(wire: WireError) -> Result<Self, Self::Error> {
        if wire.trace_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        let base = Self::try_new(wire.code, wire.message)?;
        Ok(Self {
            trace_id: wire.trace_id,
            details: wire.details,
            errors: wire.errors,
            ..base
        })
    }
}
