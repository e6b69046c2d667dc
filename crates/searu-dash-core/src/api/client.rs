//! Request client for the searu API.
//!
//! Every call goes through `ApiClient::request`: one HTTP request, no
//! retries, no status-code branching. The body is decoded leniently into an
//! `ApiResponse`, and it is up to the caller to look for an error shape.

use std::time::Duration;

use reqwest::{header, Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{ApiError, ApiResponse};
use crate::config::Config;
use crate::token::Token;

/// Everything needed to describe one outbound call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub data: Option<Value>,
    pub token: Option<Token>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            data: None,
            token: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }
}

/// API client for the searu API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with no request timeout
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::build(base_url, None)
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::build(
            &config.api_base,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Join a path onto the base address. The path is used as given.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn auth_header(token: &Token) -> Result<header::HeaderValue, ApiError> {
        let mut value = header::HeaderValue::from_str(&format!("Token {}", token.as_str()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    fn to_body<B: Serialize + ?Sized>(data: &B) -> Result<Value, ApiError> {
        serde_json::to_value(data).map_err(ApiError::Serialize)
    }

    /// Issue exactly one request and decode its body.
    pub async fn request(&self, spec: RequestSpec) -> Result<ApiResponse, ApiError> {
        let url = self.url(&spec.path);
        debug!(
            method = %spec.method,
            url = %url,
            authenticated = spec.token.is_some(),
            has_body = spec.data.is_some(),
            "Sending API request"
        );

        let mut request = self.client.request(spec.method, &url);
        if let Some(ref token) = spec.token {
            request = request.header(header::AUTHORIZATION, Self::auth_header(token)?);
        }
        if let Some(ref data) = spec.data {
            request = request.json(data);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let decoded = ApiResponse::decode(text);
        debug!(
            url = %url,
            status = status.as_u16(),
            raw = decoded.is_raw(),
            "Received API response"
        );
        Ok(decoded)
    }

    pub async fn get(&self, path: &str, token: &Token) -> Result<ApiResponse, ApiError> {
        self.request(RequestSpec::new(Method::GET, path).with_token(token.clone()))
            .await
    }

    pub async fn del(&self, path: &str, token: &Token) -> Result<ApiResponse, ApiError> {
        self.request(RequestSpec::new(Method::DELETE, path).with_token(token.clone()))
            .await
    }

    /// POST is the only verb that may go out unauthenticated (login, logout).
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        token: Option<&Token>,
    ) -> Result<ApiResponse, ApiError> {
        let mut spec = RequestSpec::new(Method::POST, path).with_data(Self::to_body(data)?);
        if let Some(token) = token {
            spec = spec.with_token(token.clone());
        }
        self.request(spec).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        token: &Token,
    ) -> Result<ApiResponse, ApiError> {
        self.request(
            RequestSpec::new(Method::PUT, path)
                .with_data(Self::to_body(data)?)
                .with_token(token.clone()),
        )
        .await
    }
}
