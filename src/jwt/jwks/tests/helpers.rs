use crate::jwt::generator::{Generator, SigningKey};
use crate::jwt::test_keys::{certificate_x5c, private_key_pkcs1_pem};
use crate::jwt::types::{Algorithm, Headers};
use rsa::RsaPrivateKey;
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub(super) struct JwksServer {
    pub(super) uri: String,
    count: Arc<AtomicUsize>,
    shutdown: Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl JwksServer {
    pub(super) fn requests(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Drop for JwksServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Serves each `(status, body)` response once, in order, then stops accepting.
pub(super) fn serve_jwks_sequence(responses: Vec<(u16, String)>) -> JwksServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.set_nonblocking(true).expect("nonblocking");
    let addr = listener.local_addr().expect("addr");
    let count = Arc::new(AtomicUsize::new(0));
    let count_thread = Arc::clone(&count);
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        while count_thread.load(Ordering::SeqCst) < responses.len() {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            match listener.accept() {
                Ok((mut stream, _)) => {
                    let idx = count_thread.fetch_add(1, Ordering::SeqCst);
                    let (status, body) = &responses[idx];
                    let _ = stream.set_nonblocking(false);
                    let mut buf = [0u8; 2048];
                    let _ = stream.read(&mut buf);
                    let response = format!(
                        "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes());
                    let _ = stream.flush();
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });
    JwksServer {
        uri: format!("http://{addr}/.well-known/jwks.json"),
        count,
        shutdown: shutdown_tx,
        handle: Some(handle),
    }
}

pub(super) fn ok(body: String) -> (u16, String) {
    (200, body)
}

/// JWKS document publishing each key's certificate under its `kid`.
pub(super) fn jwks_document(keys: &[(&str, &RsaPrivateKey)]) -> String {
    let keys: Vec<Value> = keys
        .iter()
        .map(|(kid, key)| {
            json!({
                "kty": "RSA",
                "use": "sig",
                "kid": kid,
                "x5c": [certificate_x5c(key)],
            })
        })
        .collect();
    json!({ "keys": keys }).to_string()
}

pub(super) fn rs256_token(kid: &str, key: &RsaPrivateKey) -> String {
    let Value::Object(claims) = json!({"sub": "abc", "aud": "xyz"}) else {
        unreachable!("literal object");
    };
    let mut header = Headers::new();
    header.insert("kid".to_string(), json!(kid));
    Generator::new(
        SigningKey::private_key(private_key_pkcs1_pem(key)),
        Algorithm::Rs256,
    )
    .expect("generator")
    .create(&claims, &header)
    .expect("token")
    .into_string()
}
