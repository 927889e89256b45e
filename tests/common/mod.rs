#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD as BASE64_STD;
use base64::Engine as _;
use pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::thread_rng;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{json, Map, Value};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::Duration;
use x509_cert::certificate::{Certificate, TbsCertificate, Version};
use x509_cert::der::asn1::{BitString, ObjectIdentifier};
use x509_cert::der::{Decode, Encode};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::Validity;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct TestServer {
    pub base_url: String,
    request_lines: Arc<Mutex<Vec<String>>>,
    shutdown: Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl TestServer {
    pub fn jwks_uri(&self) -> String {
        format!("{}/.well-known/jwks.json", self.base_url)
    }

    /// Request lines (`GET /path HTTP/1.1`) in arrival order.
    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().expect("request lines").clone()
    }

    pub fn request_count(&self) -> usize {
        self.request_lines.lock().expect("request lines").len()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Answers one connection per response, in order.
pub fn serve_sequence(responses: Vec<String>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.set_nonblocking(true).expect("nonblocking");
    let addr = listener.local_addr().expect("addr");
    let request_lines = Arc::new(Mutex::new(Vec::new()));
    let lines_thread = Arc::clone(&request_lines);
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut served = 0;
        while served < responses.len() {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            match listener.accept() {
                Ok((mut stream, _)) => {
                    let _ = stream.set_nonblocking(false);
                    let mut buf = [0u8; 4096];
                    let read = stream.read(&mut buf).unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..read]);
                    let line = request.lines().next().unwrap_or_default().to_string();
                    lines_thread.lock().expect("request lines").push(line);
                    let _ = stream.write_all(responses[served].as_bytes());
                    let _ = stream.flush();
                    served += 1;
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });
    TestServer {
        base_url: format!("http://{addr}"),
        request_lines,
        shutdown: shutdown_tx,
        handle: Some(handle),
    }
}

pub fn response_with_body(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

pub fn rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut thread_rng(), 2048).expect("private key"))
}

pub fn other_rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut thread_rng(), 2048).expect("private key"))
}

pub fn private_key_pem(key: &RsaPrivateKey) -> String {
    key.to_pkcs8_pem(LineEnding::LF)
        .expect("private key pem")
        .to_string()
}

pub fn public_key_pem(key: &RsaPrivateKey) -> String {
    RsaPublicKey::from(key)
        .to_public_key_pem(LineEnding::LF)
        .expect("public key pem")
}

/// Base64 DER certificate for a JWKS `x5c` entry. Only its SPKI is meaningful.
pub fn certificate_x5c(key: &RsaPrivateKey) -> String {
    let spki_der = RsaPublicKey::from(key)
        .to_public_key_der()
        .expect("spki der");
    let algorithm = AlgorithmIdentifierOwned {
        oid: ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11"),
        parameters: None,
    };
    let cert = Certificate {
        tbs_certificate: TbsCertificate {
            version: Version::V3,
            serial_number: SerialNumber::new(&[42]).expect("serial"),
            signature: algorithm.clone(),
            issuer: Name::default(),
            validity: Validity::from_now(Duration::from_secs(3600)).expect("validity"),
            subject: Name::default(),
            subject_public_key_info: SubjectPublicKeyInfoOwned::from_der(spki_der.as_bytes())
                .expect("spki"),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: None,
        },
        signature_algorithm: algorithm,
        signature: BitString::from_bytes(&[0u8; 16]).expect("signature"),
    };
    BASE64_STD.encode(cert.to_der().expect("certificate der"))
}

pub fn jwks_body(keys: &[(&str, &RsaPrivateKey)]) -> String {
    let keys: Vec<Value> = keys
        .iter()
        .map(|(kid, key)| json!({"kty": "RSA", "kid": kid, "x5c": [certificate_x5c(key)]}))
        .collect();
    json!({ "keys": keys }).to_string()
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
