use crate::error::{read_body_with_limit, Error, MAX_ERROR_BODY_BYTES};
use log::{debug, warn};
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::cache::KeySet;
use super::sanitize::{redact_jwks_uri, sanitize_error_body};
use crate::jwt::constants::{DEFAULT_JWKS_TIMEOUT, MAX_JWKS_BODY_BYTES};

const PEM_LINE_WIDTH: usize = 64;

/// Blocking JWKS client. Only `kid` and the first `x5c` certificate of each
/// key are retained.
#[derive(Debug, Clone)]
pub struct JwksFetcher {
    http: HttpClient,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<Value>,
}

impl JwksFetcher {
    pub fn new() -> Result<Self, Error> {
        let http = HttpClient::builder().build()?;
        Ok(Self {
            http,
            timeout: Some(DEFAULT_JWKS_TIMEOUT),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Downloads `jwks_uri` and converts it into a `kid -> PEM` map.
    pub fn fetch(&self, jwks_uri: &str) -> Result<KeySet, Error> {
        let uri = Url::parse(jwks_uri)?;
        let redacted = redact_jwks_uri(&uri);
        debug!("fetching jwks from {redacted}");

        let mut req = self.http.get(uri);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let mut resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = read_body_with_limit(&mut resp, MAX_ERROR_BODY_BYTES)?;
            return Err(Error::JwksFetch {
                uri: redacted,
                status: status.as_u16(),
                body_preview: sanitize_error_body(&body),
            });
        }

        let body = read_body_with_limit(&mut resp, MAX_JWKS_BODY_BYTES + 1)?;
        if body.len() > MAX_JWKS_BODY_BYTES {
            return Err(Error::JwksFormat(format!(
                "jwks body from {redacted} exceeds {MAX_JWKS_BODY_BYTES} bytes"
            )));
        }
        let keys = key_set_from_slice(&body)?;
        debug!("fetched {} jwks keys from {redacted}", keys.len());
        Ok(keys)
    }
}

/// Parses a JWKS document into a `kid -> PEM` map.
///
/// Entries without a string `kid` or a non-empty `x5c` array are skipped.
pub fn key_set_from_slice(body: &[u8]) -> Result<KeySet, Error> {
    let document: JwksDocument = serde_json::from_slice(body)
        .map_err(|err| Error::JwksFormat(format!("invalid jwks document: {err}")))?;

    let mut keys = KeySet::new();
    for (index, entry) in document.keys.iter().enumerate() {
        let Some(kid) = entry.get("kid").and_then(Value::as_str) else {
            warn!("skipping jwks entry {index}: missing kid");
            continue;
        };
        let Some(cert) = entry
            .get("x5c")
            .and_then(Value::as_array)
            .and_then(|chain| chain.first())
            .and_then(Value::as_str)
        else {
            warn!("skipping jwks entry {index} (kid {kid}): missing x5c");
            continue;
        };
        keys.insert(kid.to_string(), certificate_to_pem(cert));
    }
    Ok(keys)
}

/// Wraps a base64 DER certificate (as found in `x5c`) in PEM armor.
pub fn certificate_to_pem(cert_b64: &str) -> String {
    let body: Vec<char> = cert_b64.chars().filter(|c| !c.is_whitespace()).collect();
    let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
    for line in body.chunks(PEM_LINE_WIDTH) {
        pem.extend(line);
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");
    pem
}
