//! Response envelopes and error-body parsing.
//!
//! FDM uses two different error shapes: the token endpoint answers with a flat
//! `{"message": "..."}` object while every other endpoint wraps a structured
//! error in `{"error": {...}}`. The caller always knows which endpoint it hit,
//! so the shape is selected by an explicit flag instead of by probing the body.

use crate::error::{ApiError, Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error body returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
struct AuthErrorEnvelope {
    message: String,
}

/// Error body returned by every non-authentication endpoint.
#[derive(Debug, Clone, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

/// Classify a non-2xx response body into a typed error.
///
/// With `authenticating` set the body must be a flat object carrying a string
/// `message`, which becomes an [`Error::AuthError`]. Otherwise the body must be
/// the `{"error": {...}}` envelope, which becomes an [`Error::ApiError`]. A body
/// matching neither shape yields [`Error::SerializationError`].
#[must_use]
pub fn parse_error_body(body: &[u8], authenticating: bool) -> Error {
    if authenticating {
        match serde_json::from_slice::<AuthErrorEnvelope>(body) {
            Ok(envelope) => Error::AuthError(envelope.message),
            Err(err) => Error::SerializationError(format!(
                "malformed authentication error body: {err}"
            )),
        }
    } else {
        match serde_json::from_slice::<ApiErrorEnvelope>(body) {
            Ok(envelope) => Error::ApiError(envelope.error),
            Err(err) => {
                Error::SerializationError(format!("malformed API error body: {err}"))
            }
        }
    }
}

/// Decode a success body into `T`, mapping failures to [`Error::SerializationError`].
///
/// # Errors
///
/// Returns an error when the body is not valid JSON for `T`.
pub fn decode<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|err| {
        Error::SerializationError(format!(
            "failed to decode {}: {err}",
            std::any::type_name::<T>()
        ))
    })
}

/// List envelope returned by collection endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResponse<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Paging metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

/// Paging metadata attached to list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paging {
    /// Links to previous pages.
    #[serde(default)]
    pub prev: Vec<String>,
    /// Links to following pages.
    #[serde(default)]
    pub next: Vec<String>,
    /// Page size.
    #[serde(default)]
    pub limit: u32,
    /// Offset of this page.
    #[serde(default)]
    pub offset: u32,
    /// Number of items on this page.
    #[serde(default)]
    pub count: u32,
    /// Total number of pages.
    #[serde(default)]
    pub pages: u32,
}
