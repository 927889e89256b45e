use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::thread_rng;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::OnceLock;
use std::time::Duration;
use x509_cert::certificate::{Certificate, TbsCertificate, Version};
use x509_cert::der::asn1::{BitString, ObjectIdentifier};
use x509_cert::der::{Decode, Encode};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::Validity;

use super::jwks::certificate_to_pem;

const SHA256_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");

pub(crate) fn rsa_private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut thread_rng(), 2048).expect("private key"))
}

pub(crate) fn other_rsa_private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut thread_rng(), 2048).expect("private key"))
}

pub(crate) fn private_key_pkcs1_pem(key: &RsaPrivateKey) -> String {
    key.to_pkcs1_pem(LineEnding::LF)
        .expect("pkcs1 pem")
        .to_string()
}

pub(crate) fn private_key_pkcs8_pem(key: &RsaPrivateKey) -> String {
    key.to_pkcs8_pem(LineEnding::LF)
        .expect("pkcs8 pem")
        .to_string()
}

pub(crate) fn public_key_pem(key: &RsaPrivateKey) -> String {
    RsaPublicKey::from(key)
        .to_public_key_pem(LineEnding::LF)
        .expect("public key pem")
}

pub(crate) fn public_key_pkcs1_pem(key: &RsaPrivateKey) -> String {
    RsaPublicKey::from(key)
        .to_pkcs1_pem(LineEnding::LF)
        .expect("pkcs1 public key pem")
}

/// Self-describing certificate wrapping the key's public half. The outer
/// signature is a placeholder; only the embedded SPKI is ever read.
pub(crate) fn certificate_der(key: &RsaPrivateKey) -> Vec<u8> {
    let spki_der = RsaPublicKey::from(key)
        .to_public_key_der()
        .expect("spki der");
    let spki = SubjectPublicKeyInfoOwned::from_der(spki_der.as_bytes()).expect("spki");
    let algorithm = AlgorithmIdentifierOwned {
        oid: SHA256_WITH_RSA,
        parameters: None,
    };
    let tbs_certificate = TbsCertificate {
        version: Version::V3,
        serial_number: SerialNumber::new(&[1]).expect("serial"),
        signature: algorithm.clone(),
        issuer: Name::default(),
        validity: Validity::from_now(Duration::from_secs(3600)).expect("validity"),
        subject: Name::default(),
        subject_public_key_info: spki,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: None,
    };
    Certificate {
        tbs_certificate,
        signature_algorithm: algorithm,
        signature: BitString::from_bytes(&[0u8; 16]).expect("signature"),
    }
    .to_der()
    .expect("certificate der")
}

/// Certificate as it appears in a JWKS `x5c` array.
pub(crate) fn certificate_x5c(key: &RsaPrivateKey) -> String {
    STANDARD.encode(certificate_der(key))
}

pub(crate) fn certificate_pem(key: &RsaPrivateKey) -> String {
    certificate_to_pem(&certificate_x5c(key))
}
