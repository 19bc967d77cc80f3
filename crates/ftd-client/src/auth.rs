//! Session state and bearer-token acquisition.
//!
//! The session is shared by every clone of an [`FtdClient`] and sits behind an
//! async `RwLock`: requests take a read lock just long enough to copy the
//! token, while [`FtdClient::authenticate`] holds the write lock for the whole
//! token exchange so no request goes out with a token that is being replaced.
//!
//! Tokens are never renewed automatically. The token endpoint also returns a
//! refresh token; it is required to be present but is not kept.

use crate::client::{ApiRequest, Auth, FtdClient};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use ftd_core::config::{FtdClientConfig, GrantConfig};
use ftd_core::envelope::decode;
use ftd_core::types::TOKEN_ENDPOINT;
use ftd_core::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Bearer token and its absolute expiry.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl Token {
    #[must_use]
    pub(crate) const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Mutable per-client state.
#[derive(Debug)]
pub(crate) struct Session {
    grant: Option<GrantConfig>,
    token: Option<Token>,
}

impl Session {
    pub(crate) fn new(config: &FtdClientConfig) -> Self {
        Self {
            grant: config.grant.clone(),
            token: None,
        }
    }

    pub(crate) fn bearer(&self) -> Option<&SecretString> {
        self.token.as_ref().map(|token| &token.access_token)
    }
}

#[derive(Serialize)]
struct PasswordGrantBody<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<f64>,
}

/// Build the token request for `grant`, rejecting incomplete credentials.
fn token_request(grant: Option<&GrantConfig>) -> Result<ApiRequest> {
    let grant = grant.ok_or_else(|| {
        Error::ConfigError("grant is not configured; cannot authenticate".to_string())
    })?;

    match grant {
        GrantConfig::Password { username, password } => {
            if username.is_empty() {
                return Err(Error::ConfigError(format!(
                    "username is mandatory for grant type = {}",
                    grant.grant_type()
                )));
            }
            if password.expose_secret().is_empty() {
                return Err(Error::ConfigError(format!(
                    "password is mandatory for grant type = {}",
                    grant.grant_type()
                )));
            }

            ApiRequest::post(
                TOKEN_ENDPOINT,
                &PasswordGrantBody {
                    grant_type: grant.grant_type(),
                    username,
                    password: password.expose_secret(),
                },
            )
        }
    }
}

fn missing_field(field: &str) -> Error {
    Error::AuthError(format!("missing required field in token response: {field}"))
}

/// Parse a successful token response issued at `issued_at`.
fn parse_token_response(body: &[u8], issued_at: DateTime<Utc>) -> Result<Token> {
    let response: TokenResponse = decode(body)?;

    let access_token = response
        .access_token
        .ok_or_else(|| missing_field("access_token"))?;
    response
        .refresh_token
        .ok_or_else(|| missing_field("refresh_token"))?;
    let expires_in = response
        .expires_in
        .ok_or_else(|| missing_field("expires_in"))?;

    if !expires_in.is_finite() || expires_in < 0.0 {
        return Err(Error::AuthError(format!(
            "invalid expires_in in token response: {expires_in}"
        )));
    }

    #[allow(clippy::cast_possible_truncation)]
    let lifetime = Duration::milliseconds((expires_in * 1000.0).round() as i64);
    let expires_at = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
        Error::AuthError(format!("expires_in out of range: {expires_in}"))
    })?;

    Ok(Token {
        access_token: SecretString::from(access_token),
        expires_at,
    })
}

impl FtdClient {
    /// Acquire a bearer token using the configured grant.
    ///
    /// On failure the previously held token, if any, is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for a missing or incomplete grant (no
    /// request is sent), [`Error::AuthError`] when the appliance rejects the
    /// grant or the response lacks a required field, and
    /// [`Error::TransportError`] on network failure.
    pub async fn authenticate(&self) -> Result<()> {
        let mut session = self.session.write().await;
        let request = token_request(session.grant.as_ref())?;

        let body = self
            .execute(request, Auth::Authenticating)
            .await
            .map_err(|err| {
                if err.should_log() {
                    error!(code = err.error_code(), error = %err, "FDM token request failed");
                }
                err
            })?;
        let token = parse_token_response(&body, Utc::now())?;

        info!(expires_at = %token.expires_at, "Acquired FDM access token");
        session.token = Some(token);
        Ok(())
    }

    /// Expiry of the current token, if one has been acquired.
    pub async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.session
            .read()
            .await
            .token
            .as_ref()
            .map(Token::expires_at)
    }

    /// True when no token is held or the held token has expired.
    pub async fn is_token_expired(&self) -> bool {
        self.session
            .read()
            .await
            .token
            .as_ref()
            .map_or(true, |token| token.is_expired_at(Utc::now()))
    }
}
