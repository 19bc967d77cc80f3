//! Error types for FDM operations.
//!
//! Every failure path in the client returns one of the variants below. The
//! structured variant ([`Error::ApiError`]) is only produced from a well-formed
//! `{"error": {...}}` envelope, so callers can inspect message codes without
//! guessing at the shape of the failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message code FDM returns when a create collides on name.
pub const DUPLICATE_NAME_CODE: &str = "duplicateName";

/// Message code FDM returns when a create collides on identity.
pub const DUPLICATE_ID_CODE: &str = "newInstanceWithDuplicateId";

/// Main error type for FDM operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Client or grant misconfiguration, detected before any network call
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Token acquisition failed or the token response was malformed
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// DNS, connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Response body did not match the JSON shape expected for its context
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Structured error envelope returned by a non-authentication call
    #[error("API error: {0}")]
    ApiError(ApiError),

    /// A name lookup during duplicate resolution did not return exactly one match
    #[error("Cannot resolve duplicate `{name}`: expected exactly one match, found {matches}")]
    AmbiguityError {
        /// Name used in the lookup
        name: String,
        /// Number of matches the server returned
        matches: usize,
    },
}

/// Specialized result type for FDM operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error reported by the FDM API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    /// Severity reported by the appliance (e.g. `ERROR`)
    #[serde(default)]
    pub severity: String,
    /// Error key (e.g. `Validation`)
    #[serde(default)]
    pub key: String,
    /// Ordered list of messages
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
}

/// A single message inside an [`ApiError`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiMessage {
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Machine-checkable code
    #[serde(default)]
    pub code: String,
    /// Field or object the message refers to
    #[serde(default)]
    pub location: String,
}

impl ApiError {
    /// Code of the first message, if any.
    #[must_use]
    pub fn first_code(&self) -> Option<&str> {
        self.messages.first().map(|message| message.code.as_str())
    }

    /// True when the first message reports a name or identity collision.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self.first_code(),
            Some(DUPLICATE_NAME_CODE | DUPLICATE_ID_CODE)
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.key)?;
        for message in &self.messages {
            write!(f, " [{}: {}", message.code, message.description)?;
            if !message.location.is_empty() {
                write!(f, " at {}", message.location)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::AuthError(_) => "AUTH_ERROR",
            Self::TransportError(_) => "TRANSPORT_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
            Self::ApiError(_) => "API_ERROR",
            Self::AmbiguityError { .. } => "AMBIGUITY_ERROR",
        }
    }

    /// Returns the structured API error, if this is one.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::ApiError(api) => Some(api),
            _ => None,
        }
    }

    /// True only for a structured API error whose first code is a duplicate code.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_duplicate)
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::AuthError(_) | Self::TransportError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TransportError(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::TransportError(format!("connection failed: {err}"))
        } else {
            Self::TransportError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::ConfigError(format!("invalid URL: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
