use reqwest::blocking::Response;
use std::fmt;
use std::io::Read;

pub(crate) const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// Token segment that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Claims,
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Header => f.write_str("header"),
            Segment::Claims => f.write_str("claims"),
            Segment::Signature => f.write_str("signature"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed token: expected 3 dot-separated segments, found {found}")]
    BadSeparators { found: usize },
    #[error("malformed token: could not decode {segment} segment: {reason}")]
    Decode { segment: Segment, reason: String },
    #[error("token header is missing the alg parameter")]
    MissingAlgorithm,
    #[error("token header is missing the kid parameter")]
    MissingKeyId,
    #[error("token algorithm {found} does not match expected {expected}")]
    AlgorithmMismatch { expected: String, found: String },
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("token signature could not be verified")]
    BadSignature,
    #[error(transparent)]
    Claim(#[from] ClaimError),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("jwks fetch failed: uri {uri} status {status}{}", format_preview(.body_preview))]
    JwksFetch {
        uri: String,
        status: u16,
        body_preview: String,
    },
    #[error("invalid jwks document: {0}")]
    JwksFormat(String),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures caused by the token itself: structure, header, signature or claims.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Error::BadSeparators { .. }
                | Error::Decode { .. }
                | Error::MissingAlgorithm
                | Error::MissingKeyId
                | Error::AlgorithmMismatch { .. }
                | Error::UnsupportedAlgorithm(_)
                | Error::BadSignature
                | Error::Claim(_)
        )
    }

    /// True when the JWKS endpoint could not be reached or returned an unusable response.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Io(_) | Error::JwksFetch { .. } | Error::JwksFormat(_)
        )
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::Url(_))
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub(crate) fn decode(segment: Segment, reason: impl fmt::Display) -> Self {
        Error::Decode {
            segment,
            reason: reason.to_string(),
        }
    }
}

fn format_preview(body_preview: &str) -> String {
    if body_preview.is_empty() {
        String::new()
    } else {
        format!(" body_preview {body_preview}")
    }
}

/// A violated claim rule. Each variant names the claim it concerns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("claim {claim} is required but was not present")]
    Missing { claim: &'static str },
    #[error("claim {claim} must be {expected}")]
    InvalidType {
        claim: String,
        expected: &'static str,
    },
    #[error("issuer mismatch: expected {expected}, found {found}")]
    IssuerMismatch { expected: String, found: String },
    #[error("audience mismatch: expected one of {expected:?}, found {found:?}")]
    AudienceMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("authorized party mismatch: expected one of {expected:?}, found {found}")]
    AuthorizedPartyMismatch {
        expected: Vec<String>,
        found: String,
    },
    #[error("token expired at {exp} (now {now}, leeway {leeway}s)")]
    Expired { exp: i64, now: i64, leeway: u64 },
    #[error("authentication at {auth_time} is older than max_age {max_age}s (now {now}, leeway {leeway}s)")]
    AuthTimeExceeded {
        auth_time: i64,
        max_age: u64,
        now: i64,
        leeway: u64,
    },
    #[error("nonce mismatch")]
    NonceMismatch,
    #[error("nonce must not be present in this token")]
    NonceForbidden,
    #[error("token is missing an organization claim; expected one of {expected:?}")]
    MissingOrganization { expected: Vec<String> },
    #[error("organization mismatch: expected one of {expected:?}, found {found:?}")]
    OrganizationMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("events claim is missing the {event} event")]
    MissingEvent { event: String },
}

pub(crate) fn read_body_with_limit(resp: &mut Response, limit: usize) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    resp.by_ref()
        .take(u64::try_from(limit).unwrap_or(u64::MAX))
        .read_to_end(&mut body)?;
    Ok(body)
}
