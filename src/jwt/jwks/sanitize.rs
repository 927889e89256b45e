use url::Url;

const MAX_BODY_PREVIEW_BYTES: usize = 128;

/// Renders the start of an HTTP error body as a single printable line.
pub(super) fn sanitize_error_body(body: &[u8]) -> String {
    let mut sanitized = String::new();
    for &byte in body.iter().take(MAX_BODY_PREVIEW_BYTES) {
        match byte {
            b'\n' => sanitized.push_str("\\n"),
            b'\r' => sanitized.push_str("\\r"),
            b'\t' => sanitized.push_str("\\t"),
            _ if byte.is_ascii_graphic() || byte == b' ' => sanitized.push(byte as char),
            _ => sanitized.push('.'),
        }
    }
    if body.len() > MAX_BODY_PREVIEW_BYTES {
        sanitized.push_str("...");
    }
    sanitized
}

/// Strips credentials, query and fragment from a JWKS URI before it is logged.
pub(super) fn redact_jwks_uri(uri: &Url) -> String {
    let mut redacted = uri.clone();
    let _ = redacted.set_username("");
    let _ = redacted.set_password(None);
    redacted.set_query(None);
    redacted.set_fragment(None);
    redacted.to_string()
}
