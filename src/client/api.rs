//! Caching API client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{OnceCell, RwLock};
use tracing::Instrument;

use super::transport::{HttpTransport, Transport};
use crate::cache::{cache_key, scoped_key, CacheStats, ResponseCache};
use crate::types::config::Config;
use crate::types::errors::ApiError;
use crate::types::requests::QueryParams;
use crate::types::responses::ApiResult;
use crate::StreamdashResult;

type Outcome = Result<(Value, u16), ApiError>;
type Flight = Arc<OnceCell<Outcome>>;

/// Client for the analytics backend.
///
/// Identical GET requests are served from an in-memory cache while fresh,
/// and concurrent identical cacheable requests share one network round trip. Every
/// call returns an [`ApiResult`]; nothing is raised to the caller.
///
/// Cloning is cheap and clones share the same cache.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    cache: Arc<RwLock<ResponseCache>>,
    in_flight: Arc<Mutex<HashMap<String, Flight>>>,
    scope: Option<String>,
    cache_enabled: bool,
    default_ttl: Duration,
    live_ttl: Duration,
}

impl ApiClient {
    /// Creates a client that talks HTTP to `config.api.base_url`.
    pub fn new(config: &Config) -> StreamdashResult<Self> {
        let transport = HttpTransport::from_config(&config.api)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            transport,
            cache: Arc::new(RwLock::new(ResponseCache::new(config.cache.capacity))),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            scope: config.api.token.clone(),
            cache_enabled: config.cache.enabled,
            default_ttl: config.cache.ttl(),
            live_ttl: config.cache.live_ttl(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// TTL used by the typed endpoints.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// TTL used for live feeds.
    pub fn live_ttl(&self) -> Duration {
        self.live_ttl
    }

    /// Cache key for a request, scoped by identity when a token is configured.
    pub fn key_for(&self, endpoint: &str, params: &QueryParams) -> String {
        let key = cache_key(endpoint, params);
        match self.scope.as_deref() {
            Some(scope) => scoped_key(scope, &key),
            None => key,
        }
    }

    /// GETs `endpoint` with `params`, caching a successful response for `ttl`.
    ///
    /// - fresh cache hit: returned without any network call;
    /// - transport failure: `{ error, status: 0 }`;
    /// - non-2xx: `{ error: server message or generic text, status }`;
    /// - invalid JSON or unexpected shape: `{ error, status }`.
    ///
    /// Failures are never cached. A zero `ttl` disables caching for the call.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &QueryParams,
        ttl: Duration,
    ) -> ApiResult<T> {
        let key = self.key_for(endpoint, params);
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::debug_span!("api_request", %request_id, endpoint);

        self.request_keyed(key, endpoint, params, ttl)
            .instrument(span)
            .await
    }

    async fn request_keyed<T: DeserializeOwned>(
        &self,
        key: String,
        endpoint: &str,
        params: &QueryParams,
        ttl: Duration,
    ) -> ApiResult<T> {
        if !self.cache_enabled || ttl.is_zero() {
            return match self.fetch(endpoint, params).await {
                Ok((value, status)) => decode(value, status),
                Err(e) => {
                    tracing::warn!(endpoint, status = e.status(), "request failed: {}", e);
                    e.into()
                }
            };
        }

        if let Some(hit) = self.cache.write().await.get(&key) {
            tracing::debug!(key = %key, "cache hit");
            return decode(hit.value, hit.status);
        }

        let flight = self.join_flight(&key);
        let outcome = flight
            .get_or_init(|| self.fetch_and_store::<T>(&key, endpoint, params, ttl))
            .await
            .clone();
        self.land_flight(&key, &flight);

        match outcome {
            Ok((value, status)) => decode(value, status),
            Err(e) => e.into(),
        }
    }

    /// Runs once per flight. The outcome, failures included, goes to every
    /// caller that joined the flight; only a decodable success is cached.
    async fn fetch_and_store<T: DeserializeOwned>(
        &self,
        key: &str,
        endpoint: &str,
        params: &QueryParams,
        ttl: Duration,
    ) -> Outcome {
        // A flight that landed between our miss and joining may have filled it.
        if let Some(hit) = self.cache.read().await.peek(key) {
            tracing::debug!(key = %key, "served by concurrent request");
            return Ok((hit.value, hit.status));
        }

        tracing::debug!(key = %key, transport = self.transport.name(), "cache miss, fetching");

        let (value, status) = match self.fetch(endpoint, params).await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!(endpoint, status = e.status(), "request failed: {}", e);
                return Err(e);
            }
        };

        let shape = serde_json::from_value::<T>(value.clone()).map(drop);
        match shape {
            Ok(()) => self.cache.write().await.set(key, value.clone(), status, ttl),
            Err(e) => tracing::warn!(endpoint, status, "unexpected response shape: {}", e),
        }

        Ok((value, status))
    }

    /// Issues the request and classifies the outcome.
    async fn fetch(&self, endpoint: &str, params: &QueryParams) -> Result<(Value, u16), ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let response = self.transport.get(&url, &params.pairs()).await?;

        if !response.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }

        if response.body.trim().is_empty() {
            return Ok((Value::Null, response.status));
        }

        serde_json::from_str(&response.body)
            .map(|value| (value, response.status))
            .map_err(|_| ApiError::parse(response.status))
    }

    fn join_flight(&self, key: &str) -> Flight {
        let mut flights = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        flights.entry(key.to_string()).or_default().clone()
    }

    /// Retires a finished flight so the next caller starts a fresh one.
    fn land_flight(&self, key: &str, flight: &Flight) {
        let mut flights = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if flights.get(key).is_some_and(|f| Arc::ptr_eq(f, flight)) {
            flights.remove(key);
        }
    }

    /// Number of keys with a fetch currently in progress.
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every cached response.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        tracing::debug!("cache cleared");
    }

    /// Drops the cached response for one exact request. Returns whether it existed.
    pub async fn invalidate(&self, endpoint: &str, params: &QueryParams) -> bool {
        let key = self.key_for(endpoint, params);
        self.cache.write().await.invalidate(&key)
    }

    /// Drops cached responses for `endpoint` under any parameters.
    pub async fn invalidate_endpoint(&self, endpoint: &str) -> usize {
        self.cache.write().await.invalidate_prefix(endpoint)
    }

    /// Sweeps expired entries.
    pub async fn cleanup_expired(&self) -> usize {
        self.cache.write().await.cleanup_expired()
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}

fn decode<T: DeserializeOwned>(value: Value, status: u16) -> ApiResult<T> {
    match serde_json::from_value(value) {
        Ok(data) => ApiResult::ok(data, status),
        Err(_) => ApiError::parse(status).into(),
    }
}
