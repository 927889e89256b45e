use crate::error::Error;
use serde_json::Value;

use super::constants::BACKCHANNEL_LOGOUT_EVENT;
use super::parser::Parser;
use super::types::{unix_time_now, Claims, Headers, ValidationOptions};
use super::validator::ClaimsValidator;
use super::verifier::Verifier;


/// Which OpenID Connect rule set [`Token::validate`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    IdToken,
    AccessToken,
    LogoutToken,
}

/// A parsed token of a known type.
#[derive(Debug, Clone)]
pub struct Token {
    token_type: TokenType,
    parsed: Parser,
}

impl Token {
    pub fn parse(raw: &str, token_type: TokenType) -> Result<Self, Error> {
        Ok(Self {
            token_type,
            parsed: Parser::parse(raw)?,
        })
    }

    /// Parses, verifies and validates `raw` in one step.
    pub fn decode(
        raw: &str,
        token_type: TokenType,
        verifier: &Verifier,
        options: &ValidationOptions,
    ) -> Result<Self, Error> {
        let token = Self::parse(raw, token_type)?;
        token.verify(verifier)?;
        token.validate(options)?;
        Ok(token)
    }

    pub fn verify(&self, verifier: &Verifier) -> Result<&Self, Error> {
        verifier.verify(&self.parsed)?;
        Ok(self)
    }

    /// Applies the rule set for this token's type and returns the claims.
    ///
    /// Requires `options.issuer` and at least one `options.audience` entry.
    pub fn validate(&self, options: &ValidationOptions) -> Result<&Claims, Error> {
        let issuer = options
            .issuer
            .as_deref()
            .ok_or_else(|| Error::config("an issuer is required to validate tokens"))?;
        if options.audience.is_empty() {
            return Err(Error::config("an audience is required to validate tokens"));
        }
        let audience = options.audience.as_slice();
        let now = options.now.unwrap_or_else(unix_time_now);
        let leeway = options.leeway;

        let claims = ClaimsValidator::new(self.claims());
        claims.issuer(issuer)?;
        match self.token_type {
            TokenType::IdToken => {
                claims
                    .subject()?
                    .audience(audience)?
                    .expiration(leeway, now)?
                    .issued()?;
                if let Some(nonce) = options.nonce.as_deref() {
                    claims.nonce(nonce)?;
                }
                claims.authorized_party(audience)?;
                if let Some(max_age) = options.max_age {
                    claims.auth_time(max_age, leeway, now)?;
                }
                claims.organization(options.organization.as_slice())?;
            }
            TokenType::AccessToken => {
                claims
                    .audience(audience)?
                    .expiration(leeway, now)?
                    .issued()?
                    .organization(options.organization.as_slice())?;
            }
            TokenType::LogoutToken => {
                claims
                    .audience(audience)?
                    .issued()?
                    .identifier()?
                    .events(&[BACKCHANNEL_LOGOUT_EVENT])?
                    .no_nonce()?;
            }
        }
        Ok(self.claims())
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn raw(&self) -> &str {
        self.parsed.raw()
    }

    pub fn header(&self, name: &str) -> Option<&Value> {
        self.parsed.header(name)
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.parsed.claim(name)
    }

    pub fn headers(&self) -> &Headers {
        self.parsed.headers()
    }

    pub fn claims(&self) -> &Claims {
        self.parsed.claims()
    }

    pub fn into_claims(self) -> Claims {
        self.parsed.into_claims()
    }

    /// Serializes the claims back to JSON, preserving their order.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self.claims())?)
    }
}
