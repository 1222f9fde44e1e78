//! Error types for Streamdash.

use thiserror::Error;

/// Default result type for Streamdash.
pub type StreamdashResult<T> = Result<T, StreamdashError>;

/// Errors raised outside the request path (config, IO, prompts).
///
/// Request failures never surface as this type; they are folded into
/// [`ApiResult`](crate::types::responses::ApiResult) via [`ApiError`].
#[derive(Error, Debug)]
pub enum StreamdashError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[cfg(feature = "cli")]
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Configuration not found at: {0}")]
    ConfigNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl StreamdashError {
    /// Creates a generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

/// Status reported when no HTTP response was obtained.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Failure of a single backend request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response obtained (connection refused, DNS, timeout, ...).
    #[error("{0}")]
    Network(String),

    /// Backend answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Body was not valid JSON or did not match the expected shape.
    #[error("{message}")]
    Parse { status: u16, message: String },
}

impl ApiError {
    /// HTTP status carried by the error, `0` for transport failures.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Network(_) => TRANSPORT_FAILURE_STATUS,
            ApiError::Http { status, .. } | ApiError::Parse { status, .. } => *status,
        }
    }

    /// Builds an HTTP error from a status code and the raw response body.
    ///
    /// Picks the server message from FastAPI's `detail` field, falling back
    /// to `message` / `error`, then to a generic text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = server_message(body)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        ApiError::Http { status, message }
    }

    /// Builds a parse error for a response with the given status.
    pub fn parse(status: u16) -> Self {
        ApiError::Parse {
            status,
            message: "Invalid response format from server".to_string(),
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    for field in ["detail", "message", "error"] {
        match value.get(field) {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {
                return Some(s.clone());
            }
            // FastAPI validation errors: [{"loc": [...], "msg": "...", ...}]
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_status_is_zero() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.status(), 0);
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_http_error_uses_detail() {
        let err = ApiError::from_response(404, r#"{"detail": "Streamer not found"}"#);
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "Streamer not found");
    }

    #[test]
    fn test_http_error_falls_back_to_message_field() {
        let err = ApiError::from_response(500, r#"{"message": "boom"}"#);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_http_error_validation_detail() {
        let body = r#"{"detail": [{"loc": ["query", "limit"], "msg": "value is not a valid integer"}]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(err.to_string(), "value is not a valid integer");
    }

    #[test]
    fn test_http_error_generic_message() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.status(), 502);
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_parse_error_keeps_status() {
        let err = ApiError::parse(200);
        assert_eq!(err.status(), 200);
        assert!(err.to_string().contains("Invalid response"));
    }
}
