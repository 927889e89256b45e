use crate::error::Error;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use super::constants::DEFAULT_LEEWAY_SECS;

/// Decoded JOSE header, in the order the parameters appeared.
pub type Headers = Map<String, Value>;
/// Decoded claim set, in the order the claims appeared.
pub type Claims = Map<String, Value>;

/// Signing algorithms understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    #[default]
    Rs256,
    Hs256,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Rs256 => "RS256",
            Algorithm::Hs256 => "HS256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "RS256" => Ok(Algorithm::Rs256),
            "HS256" => Ok(Algorithm::Hs256),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Caller expectations used when validating a token's claims.
///
/// `issuer` and at least one `audience` entry are required by
/// [`Token::validate`](crate::Token::validate). `now` overrides the system clock
/// (unix seconds), which is mostly useful in tests.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub issuer: Option<String>,
    pub audience: Vec<String>,
    pub organization: Vec<String>,
    pub nonce: Option<String>,
    pub max_age: Option<u64>,
    pub leeway: u64,
    pub now: Option<i64>,
}

impl ValidationOptions {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: Some(issuer.into()),
            audience: vec![audience.into()],
            ..Self::default()
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience.push(audience.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization.push(organization.into());
        self
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn with_max_age(mut self, max_age: u64) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn with_now(mut self, now: i64) -> Self {
        self.now = Some(now);
        self
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            issuer: None,
            audience: Vec::new(),
            organization: Vec::new(),
            nonce: None,
            max_age: None,
            leeway: DEFAULT_LEEWAY_SECS,
            now: None,
        }
    }
}

pub(crate) fn unix_time_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
