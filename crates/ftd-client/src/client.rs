//! Asynchronous FDM client and request dispatcher.

use crate::auth::Session;
use crate::Result;
use async_trait::async_trait;
use ftd_core::client::{ClientConfig, RequestOptions};
use ftd_core::config::FtdClientConfig;
use ftd_core::envelope::parse_error_body;
use ftd_core::Error;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("ftd-client/", env!("CARGO_PKG_VERSION"));

/// A single call against the FDM REST API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Endpoint relative to the API base path (e.g. `object/networks`).
    pub endpoint: String,
    /// JSON body, sent only for POST/PUT.
    pub body: Option<serde_json::Value>,
    /// Query pairs, sent only for GET/DELETE.
    pub query: Vec<(&'static str, String)>,
    /// Per-call options.
    pub options: RequestOptions,
}

impl ApiRequest {
    fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: Vec::new(),
            options: RequestOptions::default(),
        }
    }

    /// GET request.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// DELETE request.
    #[must_use]
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// POST request carrying `body` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if `body` cannot be encoded.
    pub fn post<B>(endpoint: impl Into<String>, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        Self::new(Method::POST, endpoint).with_body(body)
    }

    /// PUT request carrying `body` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if `body` cannot be encoded.
    pub fn put<B>(endpoint: impl Into<String>, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        Self::new(Method::PUT, endpoint).with_body(body)
    }

    fn with_body<B>(mut self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach query pairs.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach per-call options.
    #[must_use]
    pub const fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Executes authenticated API calls.
///
/// Implemented by [`FtdClient`]; the generic operations in [`crate::crud`] and
/// [`crate::duplicate`] only depend on this seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Send one request and return the raw success body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthError`] when no token has been acquired,
    /// [`Error::TransportError`] on network failure, and the parsed error body
    /// for any status outside `200..=299`.
    async fn request(&self, request: ApiRequest) -> Result<Vec<u8>>;
}

/// How a request is authenticated.
#[derive(Clone, Copy)]
pub(crate) enum Auth<'a> {
    /// The token exchange itself; no bearer header, flat error body.
    Authenticating,
    /// Any other call.
    Bearer(&'a SecretString),
}

impl Auth<'_> {
    const fn is_authenticating(&self) -> bool {
        matches!(self, Self::Authenticating)
    }
}

/// Builder for [`FtdClient`].
#[derive(Debug, Clone)]
pub struct FtdClientBuilder {
    config: FtdClientConfig,
    http_config: ClientConfig,
}

impl FtdClientBuilder {
    /// Create a builder from a [`FtdClientConfig`].
    #[must_use]
    pub fn new(config: FtdClientConfig) -> Self {
        Self {
            config,
            http_config: ClientConfig::new(),
        }
    }

    /// Override the HTTP client configuration.
    ///
    /// The request timeout always comes from [`FtdClientConfig`].
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Build the client. No request is sent.
    pub fn build(self) -> Result<FtdClient> {
        let base_url = self.config.base_url()?;
        let http_config = self.http_config.with_timeout(self.config.timeout());

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(http_config.timeout)
            .connect_timeout(http_config.connect_timeout)
            .pool_idle_timeout(http_config.pool_idle_timeout)
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
            .gzip(http_config.enable_compression);

        if !self.config.tls_verify {
            warn!(host = %self.config.host, "TLS verification disabled for FDM client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build FDM HTTP client: {err}"))
        })?;

        Ok(FtdClient {
            http,
            base_url,
            session: Arc::new(RwLock::new(Session::new(&self.config))),
        })
    }
}

/// Asynchronous FDM client.
///
/// Cloning is cheap and clones share the same session.
#[derive(Clone)]
pub struct FtdClient {
    http: Client,
    base_url: Url,
    pub(crate) session: Arc<RwLock<Session>>,
}

impl FtdClient {
    /// Construct an unauthenticated client from the configuration.
    pub fn new(config: FtdClientConfig) -> Result<Self> {
        FtdClientBuilder::new(config).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: FtdClientConfig) -> FtdClientBuilder {
        FtdClientBuilder::new(config)
    }

    /// Build a client and acquire its first token.
    pub async fn connect(config: FtdClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.authenticate().await?;
        Ok(client)
    }

    /// Return the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|err| Error::ConfigError(format!("Invalid FDM endpoint `{endpoint}`: {err}")))
    }

    async fn bearer_token(&self) -> Result<SecretString> {
        let session = self.session.read().await;
        session.bearer().cloned().ok_or_else(|| {
            Error::AuthError("no access token; authenticate before sending requests".to_string())
        })
    }

    /// Send one request over the wire.
    pub(crate) async fn execute(&self, request: ApiRequest, auth: Auth<'_>) -> Result<Vec<u8>> {
        let url = self.build_url(&request.endpoint)?;
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Auth::Bearer(token) = auth {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }

        info!(method = %request.method, endpoint = %request.endpoint, "Sending FDM request");
        debug!(query = ?request.query, "FDM request query");

        let response = builder.send().await.map_err(|err| {
            let err = Error::from(err);
            error!(endpoint = %request.endpoint, error = %err, "FDM request failed");
            err
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(Error::from)?.to_vec();
        debug!(endpoint = %request.endpoint, %status, "FDM response received");

        if status.is_success() {
            return Ok(body);
        }

        Err(match parse_error_body(&body, auth.is_authenticating()) {
            Error::SerializationError(message) => {
                Error::SerializationError(format!("HTTP {status}: {message}"))
            }
            other => other,
        })
    }
}

#[async_trait]
impl Dispatch for FtdClient {
    async fn request(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let token = self.bearer_token().await?;
        self.execute(request, Auth::Bearer(&token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftd_core::config::Scheme;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> FtdClientConfig {
        FtdClientConfig::new(server.address().to_string())
            .unwrap()
            .with_scheme(Scheme::Http)
            .with_password_grant("admin", "Admin123")
    }

    async fn authenticated_client(server: &MockServer) -> FtdClient {
        Mock::given(method("POST"))
            .and(path("/api/fdm/v1/fdm/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-1",
                "refresh_token": "ref-1",
                "expires_in": 1800
            })))
            .mount(server)
            .await;

        FtdClient::connect(test_config(server)).await.unwrap()
    }

    #[test]
    fn builder_rejects_invalid_host() {
        let config = FtdClientConfig::new("ftd.example.com/extra").unwrap();
        assert!(matches!(
            FtdClient::new(config),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn base_url_includes_api_prefix() {
        let config = FtdClientConfig::new("ftd.example.com").unwrap();
        let client = FtdClient::new(config).unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://ftd.example.com/api/fdm/v1/"
        );
    }

    #[test]
    fn post_request_carries_json_body() {
        let request = ApiRequest::post("object/networks", &json!({"name": "a"})).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(json!({"name": "a"})));
        assert!(ApiRequest::get("object/networks").body.is_none());
    }

    #[tokio::test]
    async fn request_without_token_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = FtdClient::new(test_config(&server)).unwrap();
        let err = client
            .request(ApiRequest::get("object/networks"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthError(_)));
    }

    #[tokio::test]
    async fn get_attaches_bearer_and_query() {
        let server = MockServer::start().await;
        let client = authenticated_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/fdm/v1/object/networks"))
            .and(header("authorization", "Bearer tok-1"))
            .and(header("content-type", "application/json"))
            .and(query_param("filter", "name:testObj001"))
            .and(query_param("limit", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let body = client
            .request(ApiRequest::get("object/networks").with_query(vec![
                ("filter", "name:testObj001".to_string()),
                ("limit", "0".to_string()),
            ]))
            .await
            .unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            json!({"items": []})
        );
    }

    #[tokio::test]
    async fn put_sends_json_body() {
        let server = MockServer::start().await;
        let client = authenticated_client(&server).await;

        Mock::given(method("PUT"))
            .and(path("/api/fdm/v1/object/networks/abc"))
            .and(body_json(json!({"name": "n", "value": "1.1.1.1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        client
            .request(
                ApiRequest::put(
                    "object/networks/abc",
                    &json!({"name": "n", "value": "1.1.1.1"}),
                )
                .unwrap(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn structured_error_is_returned() {
        let server = MockServer::start().await;
        let client = authenticated_client(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/fdm/v1/object/networks"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "error": {
                    "severity": "ERROR",
                    "key": "Validation",
                    "messages": [{
                        "description": "Name already exists",
                        "code": "duplicateName",
                        "location": "name"
                    }]
                }
            })))
            .mount(&server)
            .await;

        let err = client
            .request(ApiRequest::post("object/networks", &json!({"name": "n"})).unwrap())
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn unparseable_error_body_is_serialization_error() {
        let server = MockServer::start().await;
        let client = authenticated_client(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/api/fdm/v1/object/networks/abc"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client
            .request(ApiRequest::delete("object/networks/abc"))
            .await
            .unwrap_err();
        match err {
            Error::SerializationError(message) => assert!(message.contains("502")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let config = FtdClientConfig::new("127.0.0.1:1")
            .unwrap()
            .with_scheme(Scheme::Http);
        let unreachable = FtdClient::new(config).unwrap();
        let token = SecretString::from("tok-1".to_string());

        let err = unreachable
            .execute(ApiRequest::get("object/networks"), Auth::Bearer(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TransportError(_)));
    }

    #[tokio::test]
    async fn per_call_deadline_is_enforced() {
        let server = MockServer::start().await;
        let client = authenticated_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/fdm/v1/object/networks"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client
            .request(
                ApiRequest::get("object/networks")
                    .with_options(RequestOptions::with_timeout(Duration::from_millis(100))),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TransportError(_)));
    }
}
