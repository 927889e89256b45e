use crate::error::Error;
use pem::parse_many;
use pkcs8::DecodePrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::RsaPrivateKey;

/// Loads an RSA private key from the first usable PEM block.
///
/// `ENCRYPTED PRIVATE KEY` blocks need `passphrase`; plain PKCS#1 and PKCS#8
/// blocks ignore it.
pub(super) fn load_private_key(
    pem_text: &str,
    passphrase: Option<&str>,
) -> Result<RsaPrivateKey, Error> {
    let blocks =
        parse_many(pem_text).map_err(|e| Error::config(format!("pem parse error: {e}")))?;
    let mut last_error = None;
    for block in blocks {
        let parsed = match block.tag() {
            "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(block.contents())
                .map_err(|e| Error::config(format!("rsa pkcs1 private key error: {e}"))),
            "PRIVATE KEY" => RsaPrivateKey::from_pkcs8_der(block.contents())
                .map_err(|e| Error::config(format!("rsa pkcs8 private key error: {e}"))),
            "ENCRYPTED PRIVATE KEY" => match passphrase {
                Some(passphrase) => {
                    RsaPrivateKey::from_pkcs8_encrypted_der(block.contents(), passphrase)
                        .map_err(|e| Error::config(format!("encrypted private key error: {e}")))
                }
                None => Err(Error::config("encrypted private key requires a passphrase")),
            },
            _ => continue,
        };
        match parsed {
            Ok(key) => return Ok(key),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| Error::config("unsupported private key format")))
}
