//! Typed HTTP client for the gateway.
//!
//! Every verb resolves to an [`ApiResponse`]; transport failures, HTTP errors
//! and malformed bodies are all encoded in the envelope, so feature code never
//! needs to match on a transport error. The client attaches the headers
//! derived from [`ClientOptions`] and never logs credentials.

use super::envelope::{normalize_response, ApiError, ApiResponse, INVALID_RESPONSE, NETWORK_ERROR};
use crate::config::build_url_with_base;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info_span, warn, Instrument};

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Token value meaning "no real bearer token, use the dev-login key".
pub const DEVLOGIN_SENTINEL: &str = "DEVLOGIN";
pub const DEVLOGIN_HEADER: &str = "X-DevLogin-Key";
pub const ORG_ID_HEADER: &str = "x-org-id";

/// Credentials and extra headers attached to every request.
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    pub token: Option<SecretString>,
    pub org_id: Option<String>,
    pub dev_login_key: Option<SecretString>,
    /// Merged last, so they can override the derived headers.
    pub custom_headers: Vec<(String, String)>,
}

impl ClientOptions {
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    #[must_use]
    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    #[must_use]
    pub fn with_dev_login_key(mut self, key: impl Into<String>) -> Self {
        self.dev_login_key = Some(SecretString::from(key.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// A token is usable as a bearer token when set, non-empty and not the
    /// dev-login sentinel.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .map(|token| token.expose_secret())
            .filter(|token| !token.is_empty() && *token != DEVLOGIN_SENTINEL)
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    options: ClientOptions,
}

/// Builds a client for a signed-in session, the common case in feature code.
#[must_use]
pub fn create_api_client(base_url: &str, token: Option<&str>, org_id: Option<&str>) -> ApiClient {
    let mut options = ClientOptions::default();
    if let Some(token) = token {
        options = options.with_token(token);
    }
    if let Some(org_id) = org_id {
        options = options.with_org_id(org_id);
    }
    ApiClient::new(base_url, options)
}

/// Shared `reqwest` client with the crate's user agent and timeout.
#[must_use]
pub fn http_client() -> Client {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .unwrap_or_else(|err| {
            warn!("falling back to default HTTP client: {err}");
            Client::new()
        })
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, options: ClientOptions) -> Self {
        Self::with_http(http_client(), base_url, options)
    }

    /// Reuses an existing connection pool.
    #[must_use]
    pub fn with_http(http: Client, base_url: &str, options: ClientOptions) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            options,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Headers sent with every request, in precedence order.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.options.bearer_token() {
            insert_header(&mut headers, AUTHORIZATION.as_str(), &format!("Bearer {token}"));
        } else if let Some(key) = &self.options.dev_login_key {
            insert_header(&mut headers, DEVLOGIN_HEADER, key.expose_secret());
        }

        if let Some(org_id) = self.options.org_id.as_deref().filter(|id| !id.is_empty()) {
            insert_header(&mut headers, ORG_ID_HEADER, org_id);
        }

        for (name, value) in &self.options.custom_headers {
            insert_header(&mut headers, name, value);
        }

        headers
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.send(Method::GET, endpoint, None).await.decode()
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResponse<T> {
        match encode_body(body) {
            Ok(payload) => self.send(Method::POST, endpoint, Some(payload)).await.decode(),
            Err(error) => ApiResponse::failure(error),
        }
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResponse<T> {
        match encode_body(body) {
            Ok(payload) => self.send(Method::PUT, endpoint, Some(payload)).await.decode(),
            Err(error) => ApiResponse::failure(error),
        }
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResponse<T> {
        match encode_body(body) {
            Ok(payload) => self.send(Method::PATCH, endpoint, Some(payload)).await.decode(),
            Err(error) => ApiResponse::failure(error),
        }
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.send(Method::DELETE, endpoint, None).await.decode()
    }

    /// Sends a request and returns the untyped envelope.
    pub async fn send(&self, method: Method, endpoint: &str, body: Option<String>) -> ApiResponse<Value> {
        let url = build_url_with_base(&self.base_url, endpoint);
        let span = info_span!("api.request", http.method = %method, url = %url);

        async move {
            let mut builder = self.http.request(method, &url).headers(self.headers());
            if let Some(body) = body {
                builder = builder.body(body);
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(err) => {
                    warn!("request failed: {err}");
                    return ApiResponse::failure(map_request_error(&err));
                }
            };

            let status = response.status();
            let status_text = status.canonical_reason().unwrap_or_default();
            let text = match response.text().await {
                Ok(text) => text,
                Err(err) => {
                    warn!("failed to read response body: {err}");
                    return ApiResponse::failure(map_request_error(&err));
                }
            };

            let normalized = normalize_response(status.as_u16(), status_text, &text);
            match &normalized.error {
                Some(error) => debug!(status = status.as_u16(), code = %error.code, "request returned an error"),
                None => debug!(status = status.as_u16(), "request succeeded"),
            }
            normalized
        }
        .instrument(span)
        .await
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body)
        .map_err(|err| ApiError::new(INVALID_RESPONSE, format!("Failed to encode request: {err}")))
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => warn!("skipping invalid header {name}"),
    }
}

/// Maps transport errors into `NETWORK_ERROR`, calling out timeouts.
fn map_request_error(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::new(NETWORK_ERROR, "Request timed out. Please try again.")
    } else {
        ApiError::new(NETWORK_ERROR, format!("Unable to reach the server: {err}"))
    }
}
