use crate::error::ClaimError;
use serde_json::Value;

use super::constants::ORGANIZATION_WILDCARD;
use super::types::Claims;

mod readers;


use readers::{
    integer_claim, invalid_type, non_empty_string_claim, object_claim, optional_string_claim,
    owned_list, present, seconds, string_claim, string_list_claim,
};

/// Chainable claim checks over a decoded claim set.
///
/// Every check reads the claims without modifying them and returns `self` on
/// success, so checks can be combined with `?`:
///
/// ```
/// # use oidc_jwt::{ClaimsValidator, Claims};
/// # use serde_json::json;
/// # let claims: Claims = serde_json::from_value(json!({"iss": "https://issuer/", "sub": "abc"})).unwrap();
/// ClaimsValidator::new(&claims).issuer("https://issuer/")?.subject()?;
/// # Ok::<(), oidc_jwt::ClaimError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClaimsValidator<'a> {
    claims: &'a Claims,
}

impl<'a> ClaimsValidator<'a> {
    pub fn new(claims: &'a Claims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &'a Claims {
        self.claims
    }

    /// `iss` must equal `expected`.
    pub fn issuer(&self, expected: &str) -> Result<&Self, ClaimError> {
        let found = string_claim(self.claims, "iss")?;
        if found != expected {
            return Err(ClaimError::IssuerMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(self)
    }

    pub fn subject(&self) -> Result<&Self, ClaimError> {
        non_empty_string_claim(self.claims, "sub")?;
        Ok(self)
    }

    /// At least one `aud` value must appear in `expected`.
    pub fn audience<S: AsRef<str>>(&self, expected: &[S]) -> Result<&Self, ClaimError> {
        let found = string_list_claim(self.claims, "aud")?;
        if !found
            .iter()
            .any(|aud| expected.iter().any(|want| want.as_ref() == *aud))
        {
            return Err(ClaimError::AudienceMismatch {
                expected: owned_list(expected),
                found: owned_list(&found),
            });
        }
        Ok(self)
    }

    /// When `aud` holds more than one value, `azp` must be present and appear
    /// in `expected`. Single-audience tokens pass unchanged.
    pub fn authorized_party<S: AsRef<str>>(&self, expected: &[S]) -> Result<&Self, ClaimError> {
        let multi_audience = matches!(
            present(self.claims, "aud"),
            Some(Value::Array(values)) if values.len() > 1
        );
        if !multi_audience {
            return Ok(self);
        }
        let azp = string_claim(self.claims, "azp")?;
        if !expected.iter().any(|want| want.as_ref() == azp) {
            return Err(ClaimError::AuthorizedPartyMismatch {
                expected: owned_list(expected),
                found: azp.to_string(),
            });
        }
        Ok(self)
    }

    /// Passes while `now <= exp + leeway`.
    pub fn expiration(&self, leeway: u64, now: i64) -> Result<&Self, ClaimError> {
        let exp = integer_claim(self.claims, "exp")?;
        if now > exp.saturating_add(seconds(leeway)) {
            return Err(ClaimError::Expired { exp, now, leeway });
        }
        Ok(self)
    }

    pub fn issued(&self) -> Result<&Self, ClaimError> {
        integer_claim(self.claims, "iat")?;
        Ok(self)
    }

    /// Passes while `now <= auth_time + max_age + leeway`.
    pub fn auth_time(&self, max_age: u64, leeway: u64, now: i64) -> Result<&Self, ClaimError> {
        let auth_time = integer_claim(self.claims, "auth_time")?;
        let deadline = auth_time
            .saturating_add(seconds(max_age))
            .saturating_add(seconds(leeway));
        if now > deadline {
            return Err(ClaimError::AuthTimeExceeded {
                auth_time,
                max_age,
                now,
                leeway,
            });
        }
        Ok(self)
    }

    pub fn nonce(&self, expected: &str) -> Result<&Self, ClaimError> {
        if string_claim(self.claims, "nonce")? != expected {
            return Err(ClaimError::NonceMismatch);
        }
        Ok(self)
    }

    /// Logout tokens must never carry a `nonce`.
    pub fn no_nonce(&self) -> Result<&Self, ClaimError> {
        if present(self.claims, "nonce").is_some() {
            return Err(ClaimError::NonceForbidden);
        }
        Ok(self)
    }

    /// Matches `org_id` exactly or `org_name` case-insensitively against
    /// `expected`. An empty list or one containing
    /// [`ORGANIZATION_WILDCARD`] accepts any organization, including none.
    pub fn organization<S: AsRef<str>>(&self, expected: &[S]) -> Result<&Self, ClaimError> {
        if expected.is_empty()
            || expected
                .iter()
                .any(|want| want.as_ref() == ORGANIZATION_WILDCARD)
        {
            return Ok(self);
        }

        let org_id = optional_string_claim(self.claims, "org_id")?;
        let org_name = optional_string_claim(self.claims, "org_name")?;
        if org_id.is_none() && org_name.is_none() {
            return Err(ClaimError::MissingOrganization {
                expected: owned_list(expected),
            });
        }

        let id_matches =
            org_id.is_some_and(|id| expected.iter().any(|want| want.as_ref() == id));
        let name_matches = org_name.is_some_and(|name| {
            let name = name.to_lowercase();
            expected
                .iter()
                .any(|want| want.as_ref().to_lowercase() == name)
        });
        if id_matches || name_matches {
            return Ok(self);
        }
        Err(ClaimError::OrganizationMismatch {
            expected: owned_list(expected),
            found: org_id.into_iter().chain(org_name).map(str::to_string).collect(),
        })
    }

    /// `sid` must be a non-empty string.
    pub fn identifier(&self) -> Result<&Self, ClaimError> {
        non_empty_string_claim(self.claims, "sid")?;
        Ok(self)
    }

    /// `events` must be an object holding an object under every requested key.
    pub fn events<S: AsRef<str>>(&self, expected: &[S]) -> Result<&Self, ClaimError> {
        let events = object_claim(self.claims, "events")?;
        for key in expected {
            let key = key.as_ref();
            match events.get(key) {
                Some(Value::Object(_)) => {}
                Some(_) => return Err(invalid_type(format!("events.{key}"), "an object")),
                None => {
                    return Err(ClaimError::MissingEvent {
                        event: key.to_string(),
                    })
                }
            }
        }
        Ok(self)
    }
}
