use crate::codec::decode_segment;
use crate::error::{Error, Segment};
use hmac::{Hmac, Mac};
use log::{debug, warn};
use rsa::pkcs1v15::{Signature as RsaSignature, VerifyingKey as RsaVerifyingKey};
use rsa::RsaPublicKey;
use sha2::Sha256;
use signature::Verifier as _;
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use super::jwks::KeySetProvider;
use super::parser::Parser;
use super::types::Algorithm;

mod keys;


pub(crate) use keys::load_public_key;

/// Signature verification material, selected by the algorithm the caller expects.
///
/// The token's own `alg` header never chooses the key: a token whose `alg`
/// differs from the variant is rejected before any key is resolved.
#[derive(Clone)]
pub enum Verifier {
    Rs256 {
        jwks_uri: Option<String>,
        keys: Arc<KeySetProvider>,
    },
    Hs256 {
        secret: Option<Vec<u8>>,
    },
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verifier::Rs256 { jwks_uri, keys } => f
                .debug_struct("Rs256")
                .field("jwks_uri", jwks_uri)
                .field("keys", keys)
                .finish(),
            Verifier::Hs256 { secret } => f
                .debug_struct("Hs256")
                .field("secret", &secret.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

impl Verifier {
    pub fn rs256(jwks_uri: impl Into<String>, keys: Arc<KeySetProvider>) -> Self {
        Verifier::Rs256 {
            jwks_uri: Some(jwks_uri.into()),
            keys,
        }
    }

    pub fn hs256(secret: impl AsRef<[u8]>) -> Self {
        Verifier::Hs256 {
            secret: Some(secret.as_ref().to_vec()),
        }
    }

    /// The algorithm tokens must declare to be accepted.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Verifier::Rs256 { .. } => Algorithm::Rs256,
            Verifier::Hs256 { .. } => Algorithm::Hs256,
        }
    }

    /// Parses `raw` and verifies its signature.
    pub fn verify_token(&self, raw: &str) -> Result<Parser, Error> {
        let token = Parser::parse(raw)?;
        self.verify(&token)?;
        Ok(token)
    }

    /// Checks the header and signature of an already parsed token.
    pub fn verify(&self, token: &Parser) -> Result<(), Error> {
        let found = token.algorithm().ok_or(Error::MissingAlgorithm)?;
        let expected = self.algorithm();
        if found != expected.as_str() {
            return Err(Error::AlgorithmMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }

        match self {
            Verifier::Rs256 { jwks_uri, keys } => {
                let kid = token.key_id().ok_or(Error::MissingKeyId)?;
                let jwks_uri = jwks_uri
                    .as_deref()
                    .ok_or_else(|| Error::config("a jwks uri is required to verify RS256 tokens"))?;
                let Some(pem) = keys.get(jwks_uri, kid)? else {
                    debug!("kid {kid} not published by jwks endpoint");
                    return Err(Error::BadSignature);
                };
                let key = load_public_key(&pem).map_err(|err| {
                    warn!("jwks key {kid} could not be loaded: {err}");
                    Error::BadSignature
                })?;
                verify_rs256(&key, token.signing_input(), &decode_signature(token)?)
            }
            Verifier::Hs256 { secret } => {
                let secret = secret
                    .as_deref()
                    .filter(|secret| !secret.is_empty())
                    .ok_or_else(|| Error::config("a shared secret is required to verify HS256 tokens"))?;
                let computed = hmac_sha256(secret, token.signing_input())?;
                let signature = decode_signature(token)?;
                if bool::from(computed.ct_eq(&signature)) {
                    Ok(())
                } else {
                    Err(Error::BadSignature)
                }
            }
        }
    }
}

pub(crate) fn hmac_sha256(secret: &[u8], signing_input: &str) -> Result<Vec<u8>, Error> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| Error::config(format!("hmac key error: {e}")))?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn verify_rs256(key: &RsaPublicKey, signing_input: &str, signature: &[u8]) -> Result<(), Error> {
    let verifying_key = RsaVerifyingKey::<Sha256>::new(key.clone());
    let signature = RsaSignature::try_from(signature).map_err(|_| Error::BadSignature)?;
    verifying_key
        .verify(signing_input.as_bytes(), &signature)
        .map_err(|_| Error::BadSignature)
}

// An undecodable signature is reported the same way as a wrong one.
fn decode_signature(token: &Parser) -> Result<Vec<u8>, Error> {
    decode_segment(Segment::Signature, token.raw_signature()).map_err(|_| Error::BadSignature)
}
