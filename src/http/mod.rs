//! Authenticated HTTP client
//!
//! This module provides:
//! - `HttpClient`, a reqwest wrapper that joins paths onto the configured base URL,
//!   attaches the bearer token, logs every exchange and decodes response envelopes
//! - `TokenStore`, the view of the session the client needs
//! - The 401 recovery flow: one token refresh, one replay, otherwise a forced logout
//!
//! # Usage
//!
//! ```rust,ignore
//! let client = HttpClient::new(&config, session.clone())?;
//! let users: Paged<User> = client.send(ApiRequest::get("users").with_query(pairs)).await?;
//! ```

pub mod envelope;
pub mod error;

pub use envelope::Envelope;
pub use error::{message_from_body, ApiError};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{join_url, Config};
use crate::models::RefreshResponse;

/// Longest payload excerpt written to the debug log
const PAYLOAD_SUMMARY_LIMIT: usize = 512;

/// Path of the token refresh endpoint
pub const REFRESH_PATH: &str = "auth/refresh";

/// Token access the client needs from the session
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current access token, read fresh for every attempt
    async fn access_token(&self) -> Option<String>;

    async fn refresh_token(&self) -> Option<String>;

    /// Replace the access token after a refresh
    async fn set_token(&self, token: String);

    /// Drop the session after an unrecoverable 401
    async fn logout(&self);
}

/// A request that can be replayed
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `users/3`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Decode(format!("failed to encode request body: {}", e)))?;
        self.body = Some(body);
        Ok(self)
    }
}

/// Per-call retry bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// 0 for the first attempt, 1 for the replay after a refresh
    pub attempt: u32,
}

impl RequestContext {
    pub fn is_retry(&self) -> bool {
        self.attempt > 0
    }

    pub fn next(self) -> Self {
        Self {
            attempt: self.attempt + 1,
        }
    }
}

/// What to do after a 401
#[derive(Debug)]
enum Recovery {
    /// A new access token is in the store; replay the request
    Replay,
    /// Give up and clear the session
    ForceLogout,
}

/// HTTP client bound to one API base URL
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl HttpClient {
    /// Build a client from configuration
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let base_url = config.resolve_base_url()?;
        Self::with_base_url(base_url, config.timeout(), tokens)
    }

    /// Build a client for an already resolved base URL
    pub fn with_base_url(
        base_url: Url,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        let timeout_ms = timeout.as_millis() as u64;
        tracing::info!(base_url = %base_url, timeout_ms, "API client configured");

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::get(path).with_query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::patch(path).with_json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Send a request, recovering once from a 401, and decode the payload
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let body = self.execute(&request).await?;
        decode(body)
    }

    async fn execute(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let mut ctx = RequestContext::default();
        loop {
            let err = match self.dispatch(request, ctx).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_unauthorized() => err,
                Err(err) => return Err(err),
            };

            match self.recover_unauthorized(request, ctx).await {
                Recovery::Replay => ctx = ctx.next(),
                Recovery::ForceLogout => {
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path,
                        "Session could not be recovered, logging out"
                    );
                    self.tokens.logout().await;
                    return Err(err);
                }
            }
        }
    }

    async fn recover_unauthorized(&self, request: &ApiRequest, ctx: RequestContext) -> Recovery {
        if ctx.is_retry() {
            return Recovery::ForceLogout;
        }
        let Some(refresh_token) = self.tokens.refresh_token().await else {
            tracing::debug!(path = %request.path, "No refresh token available");
            return Recovery::ForceLogout;
        };

        match self.refresh(&refresh_token).await {
            Ok(token) => {
                tracing::info!(path = %request.path, "Access token refreshed, replaying request");
                self.tokens.set_token(token).await;
                Recovery::Replay
            }
            Err(err) => {
                tracing::warn!(path = %request.path, "Token refresh failed: {}", err);
                Recovery::ForceLogout
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let request =
            ApiRequest::post(REFRESH_PATH).with_json(&json!({ "refresh_token": refresh_token }))?;
        let body = self.dispatch(&request, RequestContext::default()).await?;
        let refreshed: RefreshResponse = decode(body)?;
        Ok(refreshed.token)
    }

    /// One round trip; never retries
    async fn dispatch(&self, request: &ApiRequest, ctx: RequestContext) -> Result<Value, ApiError> {
        let url = join_url(self.base_url.as_str(), &request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .query(&request.query);
        if let Some(token) = self.tokens.access_token().await {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        tracing::info!(
            method = %request.method,
            path = %request.path,
            attempt = ctx.attempt,
            "API request"
        );
        if let Some(body) = &request.body {
            tracing::debug!(path = %request.path, body = %summarize(&body.to_string()), "API request body");
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let err = ApiError::from(err);
                let duration_ms = started.elapsed().as_millis() as u64;
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    duration_ms,
                    "API request failed: {}",
                    err
                );
                return Err(err);
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;
        let duration_ms = started.elapsed().as_millis() as u64;
        let body = parse_body(&text);

        if status.is_success() {
            tracing::info!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                duration_ms,
                "API response"
            );
            tracing::debug!(path = %request.path, payload = %summarize(&text), "API response payload");
            return Ok(body);
        }

        let err = ApiError::from_response(
            status.as_u16(),
            &body,
            status.canonical_reason().unwrap_or("Request failed"),
        );
        tracing::error!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            duration_ms,
            "API error: {}",
            err.user_message()
        );
        Err(err)
    }
}

/// Decode a successful body, unwrapping the envelope
fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let envelope =
        Envelope::<T>::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    envelope
        .into_result()
        .map_err(|message| ApiError::http(400, message))
}

/// Empty bodies become `null`, non-JSON bodies a JSON string
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn summarize(text: &str) -> String {
    if text.chars().count() <= PAYLOAD_SUMMARY_LIMIT {
        return text.to_string();
    }
    let mut summary: String = text.chars().take(PAYLOAD_SUMMARY_LIMIT).collect();
    summary.push_str("...");
    summary
}
