//! Short-lived caching of search responses.
//!
//! The in-memory backend reads time through [`Clock`] so expiry is testable
//! without sleeping. The redis backend leaves expiry to the server (`SET EX`).
//! Backend failures surface as misses; a broken cache never fails a search.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::candidate::FileType;
use crate::xray::pipeline::SearchResponse;

pub const DEFAULT_TTL_SECS: u64 = 300;
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache payload error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Identity of a search for caching: normalised keywords, location, filetype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub keywords: String,
    pub location: String,
    pub file_type: FileType,
}

impl CacheKey {
    pub fn new(keywords: &str, location: Option<&str>, file_type: FileType) -> Self {
        Self {
            keywords: keywords.trim().to_lowercase(),
            location: location.unwrap_or_default().trim().to_lowercase(),
            file_type,
        }
    }

    pub fn storage_key(&self) -> String {
        format!(
            "xray:{}:{}:{}",
            self.file_type, self.location, self.keywords
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generic TTL map
// ────────────────────────────────────────────────────────────────────────────

/// Process-local map whose entries vanish `ttl` after insertion.
pub struct TtlCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<K, (DateTime<Utc>, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, (DateTime<Utc>, V)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries();
        match entries.get(key) {
            Some((expires_at, value)) if *expires_at > now => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut entries = self.entries();
        entries.retain(|_, (expires_at, _)| *expires_at > now);
        entries.insert(key, (now + self.ttl, value));
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Drops every entry and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries();
        let dropped = entries.len();
        entries.clear();
        dropped
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Search response cache
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait SearchCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<SearchResponse>;
    async fn put(&self, key: &CacheKey, response: &SearchResponse);
}

pub struct InMemorySearchCache {
    inner: TtlCache<CacheKey, SearchResponse>,
}

impl InMemorySearchCache {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: TtlCache::new(ttl_secs, clock),
        }
    }
}

#[async_trait]
impl SearchCache for InMemorySearchCache {
    async fn get(&self, key: &CacheKey) -> Option<SearchResponse> {
        self.inner.get(key)
    }

    async fn put(&self, key: &CacheKey, response: &SearchResponse) {
        self.inner.insert(key.clone(), response.clone());
    }
}

pub struct RedisSearchCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSearchCache {
    pub fn new(url: &str, ttl_secs: u64) -> Result<Self, CacheError> {
        Ok(Self {
            client: redis::Client::open(url)?,
            ttl_secs,
        })
    }

    async fn try_get(&self, key: &CacheKey) -> Result<Option<SearchResponse>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(key.storage_key())
            .query_async(&mut conn)
            .await?;
        Ok(raw.map(|r| serde_json::from_str(&r)).transpose()?)
    }

    async fn try_put(&self, key: &CacheKey, response: &SearchResponse) -> Result<(), CacheError> {
        let payload = serde_json::to_string(response)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(key.storage_key())
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SearchCache for RedisSearchCache {
    async fn get(&self, key: &CacheKey) -> Option<SearchResponse> {
        match self.try_get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "search cache read failed");
                None
            }
        }
    }

    async fn put(&self, key: &CacheKey, response: &SearchResponse) {
        if let Err(e) = self.try_put(key, response).await {
            warn!(error = %e, "search cache write failed");
        } else {
            debug!(key = %key.storage_key(), "search response cached");
        }
    }
}
