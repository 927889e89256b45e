use crate::codec::decode_json_segment;
use crate::error::{Error, Segment};
use serde_json::Value;

use super::types::{Claims, Headers};

/// A compact token split into its decoded header and claims.
///
/// The signature segment is kept exactly as it appeared on the wire so it can be
/// checked against the signing input as received.
#[derive(Debug, Clone)]
pub struct Parser {
    raw: String,
    headers: Headers,
    claims: Claims,
    signature: String,
    signing_input_len: usize,
}

struct TokenParts<'a> {
    header: &'a str,
    claims: &'a str,
    signature: &'a str,
}

impl Parser {
    pub fn parse(token: &str) -> Result<Self, Error> {
        let parts = split_token(token)?;
        let headers = decode_json_segment(Segment::Header, parts.header)?;
        let claims = decode_json_segment(Segment::Claims, parts.claims)?;
        Ok(Self {
            raw: token.to_string(),
            headers,
            claims,
            signature: parts.signature.to_string(),
            signing_input_len: parts.header.len() + 1 + parts.claims.len(),
        })
    }

    pub fn header(&self, name: &str) -> Option<&Value> {
        self.headers.get(name)
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }

    /// Returns the signature segment, still base64url encoded.
    pub fn raw_signature(&self) -> &str {
        &self.signature
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns `header.claims` exactly as received.
    pub fn signing_input(&self) -> &str {
        &self.raw[..self.signing_input_len]
    }

    pub(crate) fn algorithm(&self) -> Option<&str> {
        self.headers.get("alg").and_then(Value::as_str)
    }

    pub(crate) fn key_id(&self) -> Option<&str> {
        self.headers.get("kid").and_then(Value::as_str)
    }
}

fn split_token(token: &str) -> Result<TokenParts<'_>, Error> {
    let segments: Vec<&str> = token.split('.').collect();
    let &[header, claims, signature] = segments.as_slice() else {
        return Err(Error::BadSeparators {
            found: segments.len(),
        });
    };
    Ok(TokenParts {
        header,
        claims,
        signature,
    })
}
