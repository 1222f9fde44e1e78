//! TTL + LRU response store.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::types::requests::QueryParams;

const DEFAULT_CAPACITY: usize = 500;

/// Upper bound on entries; the LRU map preallocates for its capacity.
pub const MAX_CAPACITY: usize = 100_000;

/// Longest lifetime an entry can get; larger TTLs are clamped to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 86_400);

/// Builds the cache key for an endpoint and its query parameters.
///
/// Leading and trailing slashes of the endpoint are ignored; parameters are
/// serialized in sorted order, so `{limit, skip}` and `{skip, limit}` map to
/// the same key.
pub fn cache_key(endpoint: &str, params: &QueryParams) -> String {
    let endpoint = endpoint.trim_matches('/');
    if params.is_empty() {
        endpoint.to_string()
    } else {
        format!("{}?{}", endpoint, params.serialize())
    }
}

/// Prefixes `key` with a digest of an identity scope (e.g. a bearer token).
///
/// The raw scope never appears in the key.
pub fn scoped_key(scope: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(scope.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("@{}|{}", &digest[..16], key)
}

/// Strips the identity prefix added by [`scoped_key`], if any.
fn unscoped(key: &str) -> &str {
    match key.strip_prefix('@').and_then(|rest| rest.split_once('|')) {
        Some((_, inner)) => inner,
        None => key,
    }
}

/// A response body served from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    /// Parsed JSON body.
    pub value: Value,

    /// HTTP status the body was received with.
    pub status: u16,

    /// When the response was stored.
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug)]
struct CacheEntry {
    response: CachedResponse,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Current number of entries (expired ones included until swept).
    pub size: usize,

    /// Maximum capacity.
    pub capacity: usize,

    /// Number of cache hits.
    pub hits: u64,

    /// Number of cache misses.
    pub misses: u64,
}

impl CacheStats {
    /// Computes the hit rate.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Response cache keyed by [`cache_key`].
///
/// At most one entry exists per key; `set` overwrites.
pub struct ResponseCache {
    entries: LruCache<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// Creates a new cache holding at most `capacity` entries (clamped to [`MAX_CAPACITY`]).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.min(MAX_CAPACITY))
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached response if present and not expired.
    pub fn get(&mut self, key: &str) -> Option<CachedResponse> {
        let now = Instant::now();
        let fresh = self.entries.peek(key).map(|e| e.is_fresh(now));

        match fresh {
            Some(true) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                self.entries.get(key).map(|e| e.response.clone())
            }
            Some(false) => {
                self.entries.pop(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Inserts or overwrites `key`, expiring `ttl` from now (at most [`MAX_TTL`]).
    pub fn set(&mut self, key: impl Into<String>, value: Value, status: u16, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl.min(MAX_TTL))
            .or_else(|| now.checked_add(Duration::from_secs(365 * 86_400)))
            .unwrap_or(now);
        let entry = CacheEntry {
            response: CachedResponse {
                value,
                status,
                cached_at: Utc::now(),
            },
            expires_at,
        };
        self.entries.put(key.into(), entry);
    }

    /// Like [`get`](Self::get) but leaves stats and LRU order untouched.
    pub fn peek(&self, key: &str) -> Option<CachedResponse> {
        let now = Instant::now();
        self.entries
            .peek(key)
            .filter(|e| e.is_fresh(now))
            .map(|e| e.response.clone())
    }

    /// Whether `key` is present and fresh, without touching stats or LRU order.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries.peek(key).is_some_and(|e| e.is_fresh(now))
    }

    /// Removes a single entry by exact key. Returns whether it existed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    /// Removes every entry for `endpoint`, whatever its parameters or scope.
    pub fn invalidate_prefix(&mut self, endpoint: &str) -> usize {
        let endpoint = endpoint.trim_matches('/');
        let query_prefix = format!("{}?", endpoint);

        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(k, _)| {
                let k = unscoped(k);
                k == endpoint || k.starts_with(&query_prefix)
            })
            .map(|(k, _)| k.clone())
            .collect();

        for key in &keys {
            self.entries.pop(key);
        }
        keys.len()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes expired entries. Returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.is_fresh(now))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MINUTE: Duration = Duration::from_secs(60);

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_cache_key_without_params() {
        assert_eq!(cache_key("/games/", &QueryParams::new()), "games");
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = cache_key("games", &params(&[("skip", "5"), ("limit", "20")]));
        let b = cache_key("games", &params(&[("limit", "20"), ("skip", "5")]));
        assert_eq!(a, b);
        assert_eq!(a, "games?limit=20&skip=5");
    }

    #[test]
    fn test_cache_key_distinguishes_params() {
        let a = cache_key("games", &params(&[("limit", "20")]));
        let b = cache_key("games", &params(&[("limit", "20"), ("skip", "5")]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_scoped_key_hides_scope() {
        let key = scoped_key("secret-token", "streamers");
        assert!(key.ends_with("|streamers"));
        assert!(!key.contains("secret-token"));
        assert_ne!(key, scoped_key("other-token", "streamers"));
        assert_eq!(unscoped(&key), "streamers");
    }

    #[test]
    fn test_hit_and_miss() {
        let mut cache = ResponseCache::new(10);
        cache.set("games", json!([1, 2]), 200, MINUTE);

        let hit = cache.get("games").unwrap();
        assert_eq!(hit.value, json!([1, 2]));
        assert_eq!(hit.status, 200);
        assert!(cache.get("streamers").is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_overwrites() {
        let mut cache = ResponseCache::new(10);
        cache.set("games", json!(1), 200, MINUTE);
        cache.set("games", json!(2), 200, MINUTE);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("games").unwrap().value, json!(2));
    }

    #[test]
    fn test_peek_does_not_count() {
        let mut cache = ResponseCache::new(10);
        cache.set("games", json!(1), 200, MINUTE);

        assert!(cache.peek("games").is_some());
        assert!(cache.peek("other").is_none());
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut cache = ResponseCache::new(10);
        cache.set("games", json!([]), 200, Duration::ZERO);

        assert!(!cache.contains("games"));
        assert!(cache.get("games").is_none());
        // Expired entry is dropped on read.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_huge_ttl_keeps_entry() {
        let mut cache = ResponseCache::new(10);
        cache.set("games", json!([1]), 200, Duration::from_secs(u64::MAX));
        cache.set("streamers", json!([2]), 200, Duration::from_secs(i64::MAX as u64));

        assert_eq!(cache.get("games").unwrap().value, json!([1]));
        assert!(cache.get("streamers").is_some());
    }

    #[test]
    fn test_expiry_after_ttl() {
        let mut cache = ResponseCache::new(10);
        cache.set("live", json!([]), 200, Duration::from_millis(20));
        assert!(cache.contains("live"));

        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get("live").is_none());
    }

    #[test]
    fn test_invalidate_single_key() {
        let mut cache = ResponseCache::new(10);
        cache.set("games", json!(1), 200, MINUTE);
        cache.set("streamers", json!(2), 200, MINUTE);

        assert!(cache.invalidate("games"));
        assert!(!cache.invalidate("games"));
        assert!(cache.get("games").is_none());
        assert!(cache.get("streamers").is_some());
    }

    #[test]
    fn test_invalidate_prefix() {
        let mut cache = ResponseCache::new(10);
        cache.set("games", json!(1), 200, MINUTE);
        cache.set("games?limit=20", json!(2), 200, MINUTE);
        cache.set(scoped_key("tok", "games?limit=5"), json!(3), 200, MINUTE);
        cache.set("games/sweet-bonanza", json!(4), 200, MINUTE);
        cache.set("gamesx", json!(5), 200, MINUTE);

        assert_eq!(cache.invalidate_prefix("/games"), 3);
        assert!(cache.contains("games/sweet-bonanza"));
        assert!(cache.contains("gamesx"));
    }

    #[test]
    fn test_clear() {
        let mut cache = ResponseCache::new(10);
        cache.set("a", json!(1), 200, MINUTE);
        cache.set("b", json!(2), 200, MINUTE);

        cache.clear();

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = ResponseCache::new(2);
        cache.set("a", json!(1), 200, MINUTE);
        cache.set("b", json!(2), 200, MINUTE);
        cache.get("a");
        cache.set("c", json!(3), 200, MINUTE);

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_cleanup_expired() {
        let mut cache = ResponseCache::new(10);
        cache.set("old", json!(1), 200, Duration::ZERO);
        cache.set("new", json!(2), 200, MINUTE);

        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let cache = ResponseCache::new(0);
        assert_eq!(cache.stats().capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_huge_capacity_is_clamped() {
        let cache = ResponseCache::new(usize::MAX);
        assert_eq!(cache.stats().capacity, MAX_CAPACITY);
    }
}
