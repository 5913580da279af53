//! Session cache for raw compute responses, keyed by birth parameters.
//!
//! Entries are kept in a bounded LRU; the oldest untouched entry is evicted
//! once capacity is reached.

use crate::config::CacheConfig;
use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// Prefix of every cache key.
pub const KEY_PREFIX: &str = "ka:compute:";

/// Birth parameters as entered in the form. Kept as strings so the key
/// matches exactly what was submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputeParams {
    pub dob: String,
    pub tob: String,
    pub tz: String,
    pub lat: String,
    pub lon: String,
}

/// `dob|tob|tz|lat|lon`
pub fn key_from_params(p: &ComputeParams) -> String {
    format!("{}|{}|{}|{}|{}", p.dob, p.tob, p.tz, p.lat, p.lon)
}

fn cache_key(p: &ComputeParams) -> String {
    format!("{}{}", KEY_PREFIX, key_from_params(p))
}

/// Cached response with the time it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedCompute {
    pub saved_at: DateTime<Utc>,
    pub json: Value,
}

pub struct ComputeCache {
    entries: LruCache<String, CachedCompute>,
}

impl ComputeCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
        }
    }

    /// Cache sized from config, clamped to the valid range.
    pub fn from_config(config: &CacheConfig) -> Self {
        if config.capacity_was_clamped() {
            warn!(
                requested = config.capacity,
                used = config.effective_capacity(),
                "cache capacity out of range"
            );
        }
        Self::new(config.effective_capacity())
    }

    /// Store a response, replacing any previous one for the same params.
    pub fn save(&mut self, params: &ComputeParams, json: Value) {
        let key = cache_key(params);
        let entry = CachedCompute {
            saved_at: Utc::now(),
            json,
        };
        if let Some((evicted, _)) = self.entries.push(key.clone(), entry) {
            if evicted != key {
                debug!(key = %evicted, "evicted compute response");
            }
        }
    }

    /// Cached response for these params. A stored `null` counts as a miss.
    pub fn load(&mut self, params: &ComputeParams) -> Option<&Value> {
        self.entries
            .get(&cache_key(params))
            .map(|e| &e.json)
            .filter(|v| !v.is_null())
    }

    /// Full entry including `saved_at`, without touching recency.
    pub fn peek(&self, params: &ComputeParams) -> Option<&CachedCompute> {
        self.entries.peek(&cache_key(params))
    }

    /// Drop the entry for these params. Returns whether one existed.
    pub fn clear(&mut self, params: &ComputeParams) -> bool {
        self.entries.pop(&cache_key(params)).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}
