//! Configuration structures for FDM clients.
//!
//! [`FtdClientConfig`] names the appliance, the transport trust mode and the
//! grant used to obtain a bearer token. It can be built in code or deserialized
//! from any serde format; secrets are never serialized back out.

use crate::types::API_BASE_PATH;
use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Grant type string of the password grant.
pub const GRANT_TYPE_PASSWORD: &str = "password";

/// Configuration for an FDM client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FtdClientConfig {
    /// Appliance hostname or address, optionally with `:port`
    #[validate(length(min = 1))]
    pub host: String,

    /// URL scheme used to reach the appliance
    #[serde(default)]
    pub scheme: Scheme,

    /// Whether to verify TLS certificates; `false` enables insecure mode
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Grant used to acquire the bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant: Option<GrantConfig>,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

/// URL scheme of the appliance endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// HTTPS (the appliance default)
    #[default]
    Https,
    /// Plain HTTP, for test doubles and lab proxies
    Http,
}

impl Scheme {
    /// Returns the scheme as it appears in a URL.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Credentials used to obtain a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum GrantConfig {
    /// Resource-owner password grant
    Password {
        /// Login name
        username: String,
        /// Login password
        #[serde(skip_serializing, deserialize_with = "deserialize_secret")]
        password: SecretString,
    },
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl GrantConfig {
    /// Password grant from a username and password.
    #[must_use]
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Build a grant from a grant-type string and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for any grant type other than `password`.
    pub fn from_parts(
        grant_type: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        match grant_type {
            GRANT_TYPE_PASSWORD => Ok(Self::password(username, password)),
            other => Err(Error::ConfigError(format!("unknown grant type: {other}"))),
        }
    }

    /// Grant type string sent to the token endpoint.
    #[must_use]
    pub const fn grant_type(&self) -> &'static str {
        match self {
            Self::Password { .. } => GRANT_TYPE_PASSWORD,
        }
    }
}

impl FtdClientConfig {
    /// Create a new client configuration for the given appliance host.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn new(host: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            host: host.into(),
            scheme: Scheme::default(),
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            grant: None,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the URL scheme.
    #[must_use]
    pub const fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the grant.
    #[must_use]
    pub fn with_grant(mut self, grant: GrantConfig) -> Self {
        self.grant = Some(grant);
        self
    }

    /// Use the password grant.
    #[must_use]
    pub fn with_password_grant(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.with_grant(GrantConfig::password(username, password))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL of the REST API: `<scheme>://<host>/api/fdm/v1/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not form a valid URL.
    pub fn base_url(&self) -> Result<Url, Error> {
        self.validate()?;
        let raw = format!("{}://{}/{API_BASE_PATH}", self.scheme.as_str(), self.host);
        let url = Url::parse(&raw)
            .map_err(|e| Error::ConfigError(format!("Invalid appliance host `{}`: {e}", self.host)))?;
        if url.path() != format!("/{API_BASE_PATH}") {
            return Err(Error::ConfigError(format!(
                "Invalid appliance host `{}`: must not contain a path",
                self.host
            )));
        }
        Ok(url)
    }
}
