use crate::error::{Error, Segment};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{Map, Value};

/// Encodes bytes as unpadded base64url.
pub fn encode_segment(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes an unpadded base64url segment.
pub fn decode_segment(segment: Segment, input: &str) -> Result<Vec<u8>, Error> {
    if input.is_empty() {
        return Err(Error::decode(segment, "empty segment"));
    }
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::decode(segment, format!("base64url decode error: {e}")))
}

/// Serializes a JSON object and encodes it as a token segment.
pub fn encode_json_segment(value: &Map<String, Value>) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(encode_segment(&json))
}

/// Decodes a token segment that must contain a UTF-8 JSON object.
pub fn decode_json_segment(segment: Segment, input: &str) -> Result<Map<String, Value>, Error> {
    let bytes = decode_segment(segment, input)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| Error::decode(segment, format!("invalid utf-8: {e}")))?;
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::decode(segment, format!("invalid json: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::decode(
            segment,
            format!("expected a json object, found {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
