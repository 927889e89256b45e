use crate::error::ClaimError;
use serde_json::{Map, Value};

use super::super::types::Claims;

// `null` is treated the same as an absent claim.
pub(super) fn present<'c>(claims: &'c Claims, name: &str) -> Option<&'c Value> {
    claims.get(name).filter(|value| !value.is_null())
}

pub(super) fn required<'c>(claims: &'c Claims, name: &'static str) -> Result<&'c Value, ClaimError> {
    present(claims, name).ok_or(ClaimError::Missing { claim: name })
}

pub(super) fn string_claim<'c>(claims: &'c Claims, name: &'static str) -> Result<&'c str, ClaimError> {
    required(claims, name)?
        .as_str()
        .ok_or_else(|| invalid_type(name, "a string"))
}

pub(super) fn non_empty_string_claim<'c>(
    claims: &'c Claims,
    name: &'static str,
) -> Result<&'c str, ClaimError> {
    let value = string_claim(claims, name)?;
    if value.is_empty() {
        return Err(invalid_type(name, "a non-empty string"));
    }
    Ok(value)
}

pub(super) fn optional_string_claim<'c>(
    claims: &'c Claims,
    name: &'static str,
) -> Result<Option<&'c str>, ClaimError> {
    present(claims, name)
        .map(|value| value.as_str().ok_or_else(|| invalid_type(name, "a string")))
        .transpose()
}

pub(super) fn integer_claim(claims: &Claims, name: &'static str) -> Result<i64, ClaimError> {
    required(claims, name)?
        .as_i64()
        .ok_or_else(|| invalid_type(name, "an integer"))
}

pub(super) fn object_claim<'c>(
    claims: &'c Claims,
    name: &'static str,
) -> Result<&'c Map<String, Value>, ClaimError> {
    required(claims, name)?
        .as_object()
        .ok_or_else(|| invalid_type(name, "an object"))
}

/// Reads a claim that may be a single string or an array of strings.
pub(super) fn string_list_claim<'c>(
    claims: &'c Claims,
    name: &'static str,
) -> Result<Vec<&'c str>, ClaimError> {
    match required(claims, name)? {
        Value::String(single) => Ok(vec![single.as_str()]),
        Value::Array(values) => values
            .iter()
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| invalid_type(name, "a string or an array of strings"))
            })
            .collect(),
        _ => Err(invalid_type(name, "a string or an array of strings")),
    }
}

pub(super) fn invalid_type(claim: impl Into<String>, expected: &'static str) -> ClaimError {
    ClaimError::InvalidType {
        claim: claim.into(),
        expected,
    }
}

pub(super) fn owned_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|value| value.as_ref().to_string()).collect()
}

pub(super) fn seconds(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
