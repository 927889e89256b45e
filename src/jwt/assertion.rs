use crate::error::Error;
use rand::RngCore;
use serde_json::Value;
use std::time::Duration;

use super::constants::DEFAULT_ASSERTION_LIFETIME;
use super::generator::{GeneratedToken, Generator};
use super::types::{unix_time_now, Algorithm, Claims, Headers};

/// Builds the signed `client_assertion` a confidential client presents to a
/// token endpoint instead of a client secret.
#[derive(Debug, Clone)]
pub struct ClientAssertion {
    client_id: String,
    token_endpoint: String,
    lifetime: Duration,
    key_id: Option<String>,
}

impl ClientAssertion {
    pub fn new(client_id: impl Into<String>, token_endpoint: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            token_endpoint: token_endpoint.into(),
            lifetime: DEFAULT_ASSERTION_LIFETIME,
            key_id: None,
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Adds a `kid` header naming the registered key.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Claims for an assertion issued at `now` (unix seconds), with a fresh `jti`.
    pub fn claims_at(&self, now: i64) -> Claims {
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let mut claims = Claims::new();
        claims.insert("iss".to_string(), Value::from(self.client_id.as_str()));
        claims.insert("sub".to_string(), Value::from(self.client_id.as_str()));
        claims.insert("aud".to_string(), Value::from(self.token_endpoint.as_str()));
        claims.insert("jti".to_string(), Value::from(random_jti()));
        claims.insert("iat".to_string(), Value::from(now));
        claims.insert("exp".to_string(), Value::from(now.saturating_add(lifetime)));
        claims
    }

    pub fn sign(&self, generator: &Generator) -> Result<GeneratedToken, Error> {
        self.sign_at(generator, unix_time_now())
    }

    /// Signs an assertion issued at `now`. Only RS256 generators are accepted.
    pub fn sign_at(&self, generator: &Generator, now: i64) -> Result<GeneratedToken, Error> {
        if generator.algorithm() != Algorithm::Rs256 {
            return Err(Error::config(format!(
                "client assertions must be signed with RS256, not {}",
                generator.algorithm()
            )));
        }
        let mut header = Headers::new();
        if let Some(key_id) = &self.key_id {
            header.insert("kid".to_string(), Value::from(key_id.as_str()));
        }
        generator.create(&self.claims_at(now), &header)
    }
}

fn random_jti() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
