use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::token::CachedToken;
use crate::observability::metrics::get_metrics;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hit(CachedToken),
    Expired,
    Miss,
}

impl Lookup {
    pub fn label(&self) -> &'static str {
        match self {
            Lookup::Hit(_) => "hit",
            Lookup::Expired => "expired",
            Lookup::Miss => "miss",
        }
    }
}

/// In-memory token cache: cache key -> token.
///
/// Entries are only ever overwritten. Expired entries stay in the map until a
/// successful re-authentication replaces them; keys that are never retried
/// are kept for the life of the cache.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<String, CachedToken>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Insert or overwrite the entry for `key`.
    pub async fn set(&self, key: &str, token: CachedToken) {
        let size = {
            let mut map = self.inner.write().await;
            map.insert(key.to_string(), token);
            map.len()
        };
        get_metrics().await.cached_tokens.set(size as i64);
    }

    /// Look up `key`, treating entries with `expires_at <= now` as expired.
    pub async fn lookup(&self, key: &str, now: Instant) -> Lookup {
        let map = self.inner.read().await;
        match map.get(key) {
            Some(token) if token.is_valid_at(now) => Lookup::Hit(token.clone()),
            Some(_) => Lookup::Expired,
            None => Lookup::Miss,
        }
    }

    /// Get token if it exists and is not expired
    pub async fn get(&self, key: &str, now: Instant) -> Option<CachedToken> {
        match self.lookup(key, now).await {
            Lookup::Hit(token) => Some(token),
            _ => None,
        }
    }

    /// Raw entry, expired or not.
    #[cfg(test)]
    pub async fn peek(&self, key: &str) -> Option<CachedToken> {
        self.inner.read().await.get(key).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
