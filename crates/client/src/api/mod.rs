//! Backend API gateway.
//!
//! Every operation returns `Result<Outcome<T>, GatewayError>`:
//!
//! - `Ok(Outcome::Ok(value))` for a 2xx response that normalized cleanly.
//! - `Ok(Outcome::Rejected(..))` for a 4xx other than 404. These are
//!   expected (bad input, expired token) and are returned as data.
//! - `Err(GatewayError::Unavailable(..))` for a 404 or a transport failure.
//!   Never reported to diagnostics.
//! - Any other `Err` is a server-side or unexpected failure and has already
//!   been reported to the [`Diagnostics`] sink exactly once.
//!
//! A 404 is deliberately conflated with "backend not reachable": a missing
//! entity and a missing backend look the same to callers.
//!
//! [`Diagnostics`]: crate::Diagnostics

mod auth;
mod catalog;
mod client;
mod landing;
mod sales;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::normalize::NormalizeError;
use crate::store::StoreError;

pub use auth::RegisterInput;
pub use catalog::Catalog;
pub use client::{ApiClient, ApiClientBuilder};
pub use sales::WorkflowError;

/// Marker message carried by every [`GatewayError::Unavailable`].
pub const BACKEND_NOT_AVAILABLE: &str = "BACKEND_NOT_AVAILABLE";

const EMAIL_VALIDATION_MARKER: &str = "Field validation for 'Email' failed";
const VALIDATION_MARKER: &str = "Field validation";
const EMAIL_VALIDATION_MESSAGE: &str = "Por favor, ingresa un correo electrónico válido.";
const VALIDATION_MESSAGE: &str =
    "Los datos ingresados no son válidos. Verifica e intenta nuevamente.";

/// Why the backend was considered unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The backend answered 404 for this endpoint.
    NotFound { endpoint: String },
    /// The request never got a response (refused, DNS, timeout).
    Network(String),
}

/// Errors returned by gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend is absent, or answered 404.
    #[error("BACKEND_NOT_AVAILABLE")]
    Unavailable(UnavailableReason),

    /// 5xx, an unexpected status, or a body that could not be decoded.
    #[error("server error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Server { status: Option<u16>, message: String },

    /// A success body that does not describe the expected entity.
    #[error("invalid response from {endpoint}: {source}")]
    Normalize {
        endpoint: String,
        #[source]
        source: NormalizeError,
    },

    /// The client-local store could not be updated.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl GatewayError {
    /// Whether this is the silent backend-unavailable condition.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// HTTP status associated with the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => *status,
            Self::Unavailable(UnavailableReason::NotFound { .. }) => Some(404),
            _ => None,
        }
    }
}

/// A request the backend refused for client-side reasons (4xx except 404).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Rejection {
    /// User-facing message, already sanitized.
    pub message: String,
    pub status: u16,
}

/// Result of a request that reached the backend and was not a server fault.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Ok(T),
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Rejected(rejection) => Outcome::Rejected(rejection),
        }
    }

    /// The value, discarding any rejection.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Ok(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Convert into a plain `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] if the backend refused the request.
    pub fn into_result(self) -> Result<T, Rejection> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Replace raw backend validation errors with user-facing text.
#[must_use]
pub fn sanitize_message(message: &str) -> String {
    if message.contains(EMAIL_VALIDATION_MARKER) {
        EMAIL_VALIDATION_MESSAGE.to_string()
    } else if message.contains(VALIDATION_MARKER) {
        VALIDATION_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

/// Pull the error message out of a failed response body.
///
/// Looks at the `error` field, then `message`, and falls back to the status
/// reason phrase when the body is not JSON or has neither field.
#[must_use]
pub fn extract_error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"].iter().find_map(|key| {
                value
                    .get(*key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
            })
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown Error").to_string())
}
