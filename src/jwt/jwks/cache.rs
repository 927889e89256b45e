use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Key set published by one JWKS endpoint: `kid -> PEM`.
pub type KeySet = BTreeMap<String, String>;

/// Pluggable storage for fetched key sets.
///
/// Implementations are shared between threads and must serialize their own
/// reads and writes. Expired entries must not be returned from [`get`](Self::get).
pub trait KeySetCache: Send + Sync {
    fn get(&self, key: &str) -> Option<KeySet>;

    /// Stores `value` for `ttl`. Returns `false` when the backend refused the entry.
    fn set(&self, key: &str, value: KeySet, ttl: Duration) -> bool;

    fn delete(&self, key: &str);

    fn clear(&self);
}

/// Derives the cache key for a JWKS URI.
pub fn cache_key(jwks_uri: &str) -> String {
    format!("jwks.{}", hex::encode(Sha256::digest(jwks_uri.as_bytes())))
}

/// Process-local [`KeySetCache`] backed by a locked map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedKeySet>>,
}

#[derive(Debug, Clone)]
struct CachedKeySet {
    keys: KeySet,
    // `None` when `now + ttl` is not representable.
    expires_at: Option<Instant>,
}

impl CachedKeySet {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries that have not expired yet.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeySetCache for MemoryCache {
    fn get(&self, key: &str) -> Option<KeySet> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.keys.clone())
    }

    fn set(&self, key: &str, value: KeySet, ttl: Duration) -> bool {
        let cached = CachedKeySet {
            keys: value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), cached);
        true
    }

    fn delete(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
