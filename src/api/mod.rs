//! HTTP helpers for the platform JSON API with consistent headers, timeouts and
//! error handling. Feature clients (`identity::client`, `identity::proxy`) build
//! on these so request setup lives in one place. The session token is read from
//! the injected [`SessionContext`] per request; it is never logged.

pub mod errors;

pub use errors::{ApiError, FieldErrors, FALLBACK_MESSAGE};

use crate::{session::SessionContext, APP_USER_AGENT};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default request timeout applied to all calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resource responses are wrapped as `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Connection settings for the platform API.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub client_type: String,
    pub client_key: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, client_type: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client_type: client_type.into(),
            client_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_client_key(mut self, client_key: Option<String>) -> Self {
        self.client_key = client_key.filter(|key| !key.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Thin, cloneable wrapper around `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    client_type: String,
    client_key: Option<String>,
    session: SessionContext,
}

impl ApiClient {
    /// # Errors
    /// Returns [`ApiError::Config`] if the base URL is not an http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(config: ApiConfig, session: SessionContext) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|err| ApiError::Config(format!("Invalid API URL: {err}")))?;

        match base.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ApiError::Config(format!(
                    "Invalid API URL: unsupported scheme {scheme}"
                )))
            }
        }

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            client_type: config.client_type,
            client_key: config.client_key,
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn client_type(&self) -> &str {
        &self.client_type
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure, non-2xx status or bad JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(self.http.get(self.url(path)));
        handle_json_response(send(request).await?).await
    }

    /// GET a JSON resource with query parameters.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure, non-2xx status or bad JSON.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let request = self.request(self.http.get(self.url(path)).query(query));
        handle_json_response(send(request).await?).await
    }

    /// POST a JSON body and parse a JSON response.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure, non-2xx status or bad JSON.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = encode(body)?;
        let request = self.request(
            self.http
                .post(self.url(path))
                .header(header::CONTENT_TYPE, "application/json")
                .body(payload),
        );
        handle_json_response(send(request).await?).await
    }

    /// POST a JSON body; the response body is ignored.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn post_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let payload = encode(body)?;
        let request = self.request(
            self.http
                .post(self.url(path))
                .header(header::CONTENT_TYPE, "application/json")
                .body(payload),
        );
        handle_empty_response(send(request).await?).await
    }

    /// POST without a body; the response body is ignored.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let request = self.request(self.http.post(self.url(path)));
        handle_empty_response(send(request).await?).await
    }

    /// POST without a body and parse a JSON response.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure, non-2xx status or bad JSON.
    pub async fn post_empty_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(self.http.post(self.url(path)));
        handle_json_response(send(request).await?).await
    }

    fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    /// Attaches the headers every call carries.
    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let mut builder = builder
            .header(header::ACCEPT, "application/json")
            .header("Client-Type", self.client_type.as_str());

        if let Some(key) = &self.client_key {
            builder = builder.header("Client-Key", key.as_str());
        }

        if let Some(authorization) = self.session.authorization() {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }

        builder
    }
}

/// Joins a base URL and a path without doubling slashes.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Percent-encodes a single path segment (tokens, uuids).
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body)
        .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    request.send().await.map_err(map_request_error)
}

/// Maps transport errors into user-facing variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        ApiError::Serialization(format!("Failed to build request: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(error_from_response(response).await)
    }
}

async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    debug!(status, "request failed");
    ApiError::from_response(status, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(base_url: &str, token: Option<&str>) -> Result<ApiClient> {
        let config = ApiConfig::new(base_url, "webshop").with_client_key(Some("nijmegen".into()));
        Ok(ApiClient::new(
            config,
            SessionContext::in_memory(token.map(ToString::to_string)),
        )?)
    }

    #[test]
    fn build_url_joins_without_double_slashes() {
        assert_eq!(
            build_url_with_base("https://api.test/", "/identity/2fa"),
            "https://api.test/identity/2fa"
        );
        assert_eq!(
            build_url_with_base("https://api.test/api/v1", "identity/2fa"),
            "https://api.test/api/v1/identity/2fa"
        );
        assert_eq!(build_url_with_base("  ", "/identity"), "/identity");
    }

    #[test]
    fn encode_segment_escapes_separators() {
        assert_eq!(encode_segment("abc"), "abc");
        assert_eq!(encode_segment("a/b?c"), "a%2Fb%3Fc");
    }

    #[test]
    fn new_rejects_unsupported_scheme() {
        let err = ApiClient::new(
            ApiConfig::new("ftp://api.test", "webshop"),
            SessionContext::default(),
        )
        .err();
        assert!(matches!(
            err,
            Some(ApiError::Config(message)) if message.contains("unsupported scheme")
        ));
    }

    #[test]
    fn config_drops_blank_client_key() {
        let config =
            ApiConfig::new("https://api.test", "webshop").with_client_key(Some(" ".into()));
        assert_eq!(config.client_key, None);
    }

    #[tokio::test]
    async fn requests_carry_client_and_session_headers() -> Result<()> {
        if !can_bind_localhost() {
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/identity/proxy/check-token"))
            .and(query_param("access_token", "pairing"))
            .and(header("Client-Type", "webshop"))
            .and(header("Client-Key", "nijmegen"))
            .and(header("Authorization", "Bearer session-token"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "pending"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server.uri(), Some("session-token"))?;
        let value: serde_json::Value = api
            .get_json_with_query("/identity/proxy/check-token", &[("access_token", "pairing")])
            .await?;
        assert_eq!(value["message"], "pending");
        Ok(())
    }

    #[tokio::test]
    async fn failed_responses_become_http_errors() -> Result<()> {
        if !can_bind_localhost() {
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/identity/2fa"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "The phone field is invalid.",
                "errors": {"phone": ["The phone field is invalid."]}
            })))
            .mount(&server)
            .await;

        let api = client(&server.uri(), None)?;
        let err = api
            .post_json_empty("/identity/2fa", &json!({"type": "phone", "phone": "1"}))
            .await
            .err();

        let err = err.ok_or_else(|| anyhow::anyhow!("expected error"))?;
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.field_error("phone"), Some("The phone field is invalid."));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() -> Result<()> {
        let api = client("http://127.0.0.1:9", None)?;
        let err = api.post_empty("/identity/2fa/abc/resend").await.err();
        assert!(matches!(err, Some(ApiError::Network(_) | ApiError::Timeout(_))));
        Ok(())
    }
}
