//! Request core shared by every endpoint group.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use zenwatch_auth::{AccessToken, TokenResponse, TokenStore};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Path of the cookie-credentialed refresh endpoint.
const REFRESH_PATH: &str = "api/auth/refresh";

/// Async client for the `ZenWatch` backend.
///
/// Cheap to clone; clones share the connection pool, cookie jar and token store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<ClientConfig>,
    tokens: TokenStore,
    refresh_lock: Arc<tokio::sync::Mutex<()>>,
}

/// A request description that can be sent more than once.
#[derive(Debug)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    refresh_on_unauthorized: bool,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            refresh_on_unauthorized: true,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub(crate) fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub(crate) fn json(mut self, body: &impl Serialize) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Credential endpoints answer 401 for bad input; never refresh on them.
    pub(crate) const fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }
}

impl ApiClient {
    /// Creates a client with an empty token store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_tokens(config, TokenStore::new())
    }

    /// Creates a client sharing an existing token store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_tokens(config: ClientConfig, tokens: TokenStore) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            tokens,
            refresh_lock: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared token store.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Exchanges the refresh cookie for a new access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh endpoint rejects the request.
    pub async fn refresh(&self) -> Result<AccessToken> {
        debug!("Refreshing access token");
        let response = self
            .http
            .post(self.config.url(REFRESH_PATH)?)
            .send()
            .await?;
        let body: TokenResponse = Self::decode(response).await?;
        let token = AccessToken::from_response(body);
        self.tokens.refreshed(token.clone());
        Ok(token)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(&request).await?;
        Self::decode(response).await
    }

    pub(crate) async fn send_unit(&self, request: ApiRequest) -> Result<()> {
        let response = self.execute(&request).await?;
        Self::check(response).await.map(drop)
    }

    /// Sends `request`, refreshing and retrying exactly once on 401.
    async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let sent_with = self.tokens.get();
        let response = self.dispatch(request, sent_with.as_ref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !request.refresh_on_unauthorized {
            return Ok(response);
        }

        debug!(path = %request.path, "Got 401, attempting token refresh");
        self.refresh_after_unauthorized(sent_with.as_ref()).await?;

        let token = self.tokens.get();
        self.dispatch(request, token.as_ref()).await
    }

    async fn refresh_after_unauthorized(&self, rejected: Option<&AccessToken>) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;

        // Another request refreshed while we waited for the lock
        if let Some(current) = self.tokens.get()
            && rejected != Some(&current)
        {
            return Ok(());
        }

        match self.refresh().await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Token refresh failed, ending session");
                self.tokens.expire();
                Err(Error::SessionExpired)
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<Response> {
        let url = self.config.url(&request.path)?;
        debug!(method = %request.method, %url, "Sending request");

        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token.authorization_value());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    async fn check(response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }
        Ok(bytes.to_vec())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = Self::check(response).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Extracts the backend's `detail` field, falling back to the raw body.
fn error_message(body: &[u8]) -> String {
    #[derive(serde::Deserialize)]
    struct Detail {
        detail: serde_json::Value,
    }

    match serde_json::from_slice::<Detail>(body) {
        Ok(Detail {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(Detail { detail }) => detail.to_string(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_detail_string() {
        assert_eq!(
            error_message(br#"{"detail":"Article not found"}"#),
            "Article not found"
        );
    }

    #[test]
    fn test_error_message_structured_detail() {
        let msg = error_message(br#"{"detail":[{"loc":["body","email"],"msg":"bad"}]}"#);
        assert!(msg.contains("email"));
    }

    #[test]
    fn test_error_message_raw_body() {
        assert_eq!(error_message(b"  Bad Gateway \n"), "Bad Gateway");
    }
}
