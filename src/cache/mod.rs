//! In-memory cache for backend GET responses.
//!
//! Entries carry their own expiry; an expired entry is treated as absent
//! and dropped the next time it is read. Capacity is bounded with LRU
//! eviction.

mod store;

pub use store::{
    cache_key, scoped_key, CacheStats, CachedResponse, ResponseCache, MAX_CAPACITY, MAX_TTL,
};
