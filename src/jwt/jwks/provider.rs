use crate::error::Error;
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::cache::{cache_key, KeySet, KeySetCache, MemoryCache};
use super::fetcher::JwksFetcher;
use crate::jwt::constants::{DEFAULT_JWKS_CACHE_TTL, DEFAULT_JWKS_TIMEOUT, MIN_JWKS_CACHE_TTL};

/// Settings for [`KeySetProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwksOptions {
    pub cache_ttl: Duration,
    pub timeout: Option<Duration>,
}

impl Default for JwksOptions {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_JWKS_CACHE_TTL,
            timeout: Some(DEFAULT_JWKS_TIMEOUT),
        }
    }
}

impl JwksOptions {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }
}

/// Resolves `kid -> PEM` for a JWKS URI through a [`KeySetCache`].
///
/// A cached set that lacks the requested `kid` is refetched exactly once,
/// bypassing the cache, before the key is reported missing.
pub struct KeySetProvider {
    cache: Arc<dyn KeySetCache>,
    fetcher: JwksFetcher,
    cache_ttl: Duration,
}

impl fmt::Debug for KeySetProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySetProvider")
            .field("fetcher", &self.fetcher)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl KeySetProvider {
    /// Provider with an in-memory cache and default options.
    pub fn new() -> Result<Self, Error> {
        Self::with_options(JwksOptions::default())
    }

    pub fn with_options(options: JwksOptions) -> Result<Self, Error> {
        let mut fetcher = JwksFetcher::new()?;
        fetcher = match options.timeout {
            Some(timeout) => fetcher.with_timeout(timeout),
            None => fetcher.without_timeout(),
        };
        Ok(Self {
            cache: Arc::new(MemoryCache::new()),
            fetcher,
            cache_ttl: clamp_ttl(options.cache_ttl),
        })
    }

    pub fn with_cache(mut self, cache: Arc<dyn KeySetCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_fetcher(mut self, fetcher: JwksFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = clamp_ttl(ttl);
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Looks up the PEM for `kid` published at `jwks_uri`.
    ///
    /// `Ok(None)` means the key is absent even after a live refetch.
    pub fn get(&self, jwks_uri: &str, kid: &str) -> Result<Option<String>, Error> {
        let key = cache_key(jwks_uri);
        if let Some(keys) = self.cache.get(&key) {
            if let Some(pem) = keys.get(kid) {
                debug!("jwks cache hit for kid {kid}");
                return Ok(Some(pem.clone()));
            }
            debug!("kid {kid} absent from cached jwks, refetching");
        } else {
            debug!("jwks cache miss, fetching");
        }

        let mut keys = self.fetch_fresh(jwks_uri)?;
        Ok(keys.remove(kid))
    }

    /// Fetches the key set live and replaces whatever was cached for `jwks_uri`.
    pub fn fetch_fresh(&self, jwks_uri: &str) -> Result<KeySet, Error> {
        let keys = self.fetcher.fetch(jwks_uri)?;
        if !self.cache.set(&cache_key(jwks_uri), keys.clone(), self.cache_ttl) {
            warn!("jwks cache backend rejected the fetched key set");
        }
        Ok(keys)
    }

    pub fn purge(&self, jwks_uri: &str) {
        self.cache.delete(&cache_key(jwks_uri));
    }

    pub fn purge_all(&self) {
        self.cache.clear();
    }
}

fn clamp_ttl(ttl: Duration) -> Duration {
    if ttl < MIN_JWKS_CACHE_TTL {
        warn!(
            "jwks cache ttl {}s is below the {}s floor, using the floor",
            ttl.as_secs(),
            MIN_JWKS_CACHE_TTL.as_secs()
        );
        MIN_JWKS_CACHE_TTL
    } else {
        ttl
    }
}
