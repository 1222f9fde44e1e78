//! HTTP transport seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::types::config::ApiConfig;
use crate::types::errors::ApiError;
use crate::{StreamdashError, StreamdashResult};

/// Status and body of a backend response, before any JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests against the backend.
///
/// Implementations return `Err` only when no HTTP response was obtained;
/// any status code, including 4xx/5xx, is an `Ok(RawResponse)`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Issues `GET url?query`.
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, ApiError>;
}

/// [`Transport`] backed by `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport from API settings (timeout, user agent, bearer token).
    pub fn from_config(config: &ApiConfig) -> StreamdashResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = config.token.as_deref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| StreamdashError::config("api.token contains invalid characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout().min(Duration::from_secs(10)))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| StreamdashError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, ApiError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_error)?;

        Ok(RawResponse { status, body })
    }
}

fn network_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network("Request timed out".to_string())
    } else if e.is_connect() {
        ApiError::Network(format!("Could not connect to backend: {}", e))
    } else {
        ApiError::Network(e.to_string())
    }
}
