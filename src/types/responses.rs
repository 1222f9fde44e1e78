//! Response envelopes shared by every fetch function.

use serde::{Deserialize, Serialize};

use super::errors::ApiError;

/// Uniform result of a data-fetching operation.
///
/// Exactly one of `data` / `error` is present. `status` is the HTTP status
/// code, or `0` when no response was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResult<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    status: u16,
}

impl<T> ApiResult<T> {
    /// Successful result.
    pub fn ok(data: T, status: u16) -> Self {
        Self {
            data: Some(data),
            error: None,
            status,
        }
    }

    /// Failed result.
    pub fn err(error: impl Into<String>, status: u16) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            status,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.data.is_some()
    }

    /// Consumes the result, keeping only the data.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Maps the payload, keeping error and status.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResult<U> {
        ApiResult {
            data: self.data.map(f),
            error: self.error,
            status: self.status,
        }
    }

    /// Converts into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, error) => {
                let message = error.unwrap_or_default();
                Err(if self.status == 0 {
                    ApiError::Network(message)
                } else {
                    ApiError::Http {
                        status: self.status,
                        message,
                    }
                })
            }
        }
    }

    /// Returns the data or the given fallback (e.g. a bundled static dataset).
    pub fn unwrap_or(self, fallback: T) -> T {
        self.data.unwrap_or(fallback)
    }
}

impl<T> From<ApiError> for ApiResult<T> {
    fn from(error: ApiError) -> Self {
        let status = error.status();
        Self::err(error.to_string(), status)
    }
}

/// A page of results as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    #[serde(default)]
    pub total: u64,

    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default)]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// Whether more pages follow this one.
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.page.max(1)) * u64::from(self.limit);
        self.limit > 0 && seen < self.total
    }
}

/// List endpoints return either a bare array or a [`Page`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Page(page) => &page.items,
            Listing::Items(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page(page) => page.items,
            Listing::Items(items) => items,
        }
    }

    /// Total count reported by the backend, or the item count for bare arrays.
    pub fn total(&self) -> u64 {
        match self {
            Listing::Page(page) => page.total,
            Listing::Items(items) => items.len() as u64,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_serializes_without_error() {
        let result = ApiResult::ok(vec![1, 2, 3], 200);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"data": [1, 2, 3], "status": 200}));
    }

    #[test]
    fn test_err_serializes_without_data() {
        let result: ApiResult<Vec<u8>> = ApiResult::err("Not found", 404);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"error": "Not found", "status": 404}));
        assert!(!result.is_ok());
    }

    #[test]
    fn test_from_network_error() {
        let result: ApiResult<()> = ApiError::Network("timed out".to_string()).into();
        assert_eq!(result.status(), 0);
        assert_eq!(result.error(), Some("timed out"));
        assert!(result.data().is_none());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ApiResult::ok(5, 200).into_result(), Ok(5));

        let err = ApiResult::<u8>::err("gone", 410).into_result().unwrap_err();
        assert_eq!(err.status(), 410);

        let err = ApiResult::<u8>::err("refused", 0).into_result().unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_unwrap_or_fallback() {
        let result: ApiResult<Vec<&str>> = ApiResult::err("down", 503);
        assert_eq!(result.unwrap_or(vec!["static"]), vec!["static"]);
    }

    #[test]
    fn test_listing_from_page() {
        let listing: Listing<u32> =
            serde_json::from_value(json!({"items": [1, 2], "total": 10, "page": 1, "limit": 2}))
                .unwrap();
        assert!(matches!(listing, Listing::Page(_)));
        assert_eq!(listing.items(), &[1, 2]);
        assert_eq!(listing.total(), 10);
    }

    #[test]
    fn test_listing_from_array() {
        let listing: Listing<u32> = serde_json::from_value(json!([7, 8, 9])).unwrap();
        assert_eq!(listing.total(), 3);
        assert_eq!(listing.into_items(), vec![7, 8, 9]);
    }

    #[test]
    fn test_page_has_more() {
        let page = Page {
            items: vec![1, 2],
            total: 5,
            page: 1,
            limit: 2,
        };
        assert!(page.has_more());

        let last = Page {
            items: vec![5],
            total: 5,
            page: 3,
            limit: 2,
        };
        assert!(!last.has_more());
    }
}
