use crate::codec::{encode_json_segment, encode_segment};
use crate::error::Error;
use log::debug;
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::traits::PublicKeyParts;
use serde_json::Value;
use sha2::Sha256;
use signature::{SignatureEncoding, Signer};
use std::fmt;

use super::constants::{DEFAULT_MAX_RSA_BITS, DEFAULT_MIN_RSA_BITS, JWT_TYPE};
use super::types::{Algorithm, Claims, Headers};
use super::verifier::hmac_sha256;

mod keys;


use keys::load_private_key;

/// Key material used to sign tokens.
#[derive(Clone)]
pub enum SigningKey {
    /// Shared secret for HS256.
    Secret(Vec<u8>),
    /// PEM private key for RS256, optionally encrypted with `passphrase`.
    PrivateKey {
        pem: String,
        passphrase: Option<String>,
    },
}

impl SigningKey {
    pub fn secret(secret: impl AsRef<[u8]>) -> Self {
        SigningKey::Secret(secret.as_ref().to_vec())
    }

    pub fn private_key(pem: impl Into<String>) -> Self {
        SigningKey::PrivateKey {
            pem: pem.into(),
            passphrase: None,
        }
    }

    pub fn encrypted_private_key(pem: impl Into<String>, passphrase: impl Into<String>) -> Self {
        SigningKey::PrivateKey {
            pem: pem.into(),
            passphrase: Some(passphrase.into()),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningKey::Secret(_) => f.write_str("Secret(<redacted>)"),
            SigningKey::PrivateKey { passphrase, .. } => f
                .debug_struct("PrivateKey")
                .field("pem", &"<redacted>")
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// Bounds applied to RSA keys when a [`Generator`] is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub min_rsa_bits: usize,
    pub max_rsa_bits: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            min_rsa_bits: DEFAULT_MIN_RSA_BITS,
            max_rsa_bits: DEFAULT_MAX_RSA_BITS,
        }
    }
}

impl GeneratorOptions {
    pub fn with_rsa_bits(mut self, min: usize, max: usize) -> Self {
        self.min_rsa_bits = min;
        self.max_rsa_bits = max;
        self
    }
}

enum Material {
    Hmac(Vec<u8>),
    Rsa(RsaSigningKey<Sha256>),
}

/// Signs claim sets into compact tokens.
///
/// The key and algorithm are checked against each other when the generator is
/// built, so [`create`](Self::create) only fails on serialization or signing.
pub struct Generator {
    algorithm: Algorithm,
    material: Material,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl Generator {
    pub fn new(key: SigningKey, algorithm: Algorithm) -> Result<Self, Error> {
        Self::with_options(key, algorithm, GeneratorOptions::default())
    }

    /// Like [`new`](Self::new), taking the algorithm by its JOSE name.
    pub fn from_algorithm_name(key: SigningKey, algorithm: &str) -> Result<Self, Error> {
        let algorithm = algorithm
            .parse::<Algorithm>()
            .map_err(|_| Error::config(format!("unsupported signing algorithm: {algorithm}")))?;
        Self::new(key, algorithm)
    }

    pub fn with_options(
        key: SigningKey,
        algorithm: Algorithm,
        options: GeneratorOptions,
    ) -> Result<Self, Error> {
        let material = match (algorithm, key) {
            (Algorithm::Hs256, SigningKey::Secret(secret)) => {
                if secret.is_empty() {
                    return Err(Error::config("HS256 requires a non-empty shared secret"));
                }
                Material::Hmac(secret)
            }
            (Algorithm::Hs256, SigningKey::PrivateKey { .. }) => {
                return Err(Error::config("HS256 requires a shared secret, not a private key"));
            }
            (Algorithm::Rs256, SigningKey::Secret(_)) => {
                return Err(Error::config("RS256 requires a private key, not a shared secret"));
            }
            (Algorithm::Rs256, SigningKey::PrivateKey { pem, passphrase }) => {
                let key = load_private_key(&pem, passphrase.as_deref())?;
                let bits = key.size() * 8;
                if bits < options.min_rsa_bits || bits > options.max_rsa_bits {
                    return Err(Error::config(format!(
                        "rsa key is {bits} bits; expected between {} and {}",
                        options.min_rsa_bits, options.max_rsa_bits
                    )));
                }
                Material::Rsa(RsaSigningKey::<Sha256>::new(key))
            }
        };
        Ok(Self {
            algorithm,
            material,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Signs `claims` under a header built from `typ`, `alg` and `overrides`.
    ///
    /// An `alg` override never changes the signing algorithm and a `null`
    /// `typ` override never removes `typ`; both are dropped.
    pub fn create(&self, claims: &Claims, overrides: &Headers) -> Result<GeneratedToken, Error> {
        let header = self.header(overrides);
        let header = encode_json_segment(&header)?;
        let claims = encode_json_segment(claims)?;
        let signing_input = format!("{header}.{claims}");
        let signature = encode_segment(&self.sign(&signing_input)?);
        Ok(GeneratedToken {
            header,
            claims,
            signature,
        })
    }

    fn header(&self, overrides: &Headers) -> Headers {
        let alg = self.algorithm.as_str();
        let mut header = Headers::new();
        header.insert("typ".to_string(), Value::from(JWT_TYPE));
        header.insert("alg".to_string(), Value::from(alg));
        for (name, value) in overrides {
            match name.as_str() {
                "alg" => {
                    if value.as_str() != Some(alg) {
                        debug!("ignoring alg header override; signing with {alg}");
                    }
                }
                "typ" if value.is_null() => {
                    debug!("ignoring typ header removal");
                }
                _ => {
                    header.insert(name.clone(), value.clone());
                }
            }
        }
        header
    }

    fn sign(&self, signing_input: &str) -> Result<Vec<u8>, Error> {
        match &self.material {
            Material::Hmac(secret) => hmac_sha256(secret, signing_input),
            Material::Rsa(key) => key
                .try_sign(signing_input.as_bytes())
                .map(|signature| signature.to_vec())
                .map_err(|e| Error::config(format!("rsa signing error: {e}"))),
        }
    }
}

/// The three encoded segments of a generated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedToken {
    header: String,
    claims: String,
    signature: String,
}

impl GeneratedToken {
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn claims(&self) -> &str {
        &self.claims
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn parts(&self) -> [&str; 3] {
        [&self.header, &self.claims, &self.signature]
    }

    pub fn into_string(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GeneratedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.header, self.claims, self.signature)
    }
}
