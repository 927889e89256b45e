mod cache;
mod fetcher;
mod provider;
mod sanitize;

#[cfg(test)]
mod tests;

pub use cache::{cache_key, KeySet, KeySetCache, MemoryCache};
pub use fetcher::{certificate_to_pem, key_set_from_slice, JwksFetcher};
pub use provider::{JwksOptions, KeySetProvider};
