use crate::error::Error;
use pem::parse_many;
use pkcs8::DecodePublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::RsaPublicKey;
use x509_cert::der::{Decode, Encode};
use x509_cert::Certificate;

/// Loads an RSA public key from the first usable PEM block.
///
/// Accepts `CERTIFICATE` (the key is taken from the certificate's SPKI),
/// `PUBLIC KEY` and `RSA PUBLIC KEY` blocks.
pub(crate) fn load_public_key(pem_text: &str) -> Result<RsaPublicKey, Error> {
    let blocks =
        parse_many(pem_text).map_err(|e| Error::config(format!("pem parse error: {e}")))?;
    for block in blocks {
        let parsed = match block.tag() {
            "CERTIFICATE" => parse_certificate(block.contents()),
            "PUBLIC KEY" => RsaPublicKey::from_public_key_der(block.contents())
                .map_err(|e| Error::config(format!("rsa spki public key error: {e}"))),
            "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_der(block.contents())
                .map_err(|e| Error::config(format!("rsa pkcs1 public key error: {e}"))),
            _ => continue,
        };
        if let Ok(key) = parsed {
            return Ok(key);
        }
    }
    Err(Error::config("unsupported public key format"))
}

fn parse_certificate(der: &[u8]) -> Result<RsaPublicKey, Error> {
    let cert = Certificate::from_der(der)
        .map_err(|e| Error::config(format!("certificate parse error: {e}")))?;
    let spki = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| Error::config(format!("certificate spki error: {e}")))?;
    RsaPublicKey::from_public_key_der(&spki)
        .map_err(|e| Error::config(format!("certificate public key error: {e}")))
}
