mod assertion;
mod constants;
mod generator;
mod jwks;
mod parser;
mod token;
mod types;
mod validator;
mod verifier;

#[cfg(test)]
pub(crate) mod test_keys;

pub use assertion::ClientAssertion;
pub use constants::{BACKCHANNEL_LOGOUT_EVENT, CLIENT_ASSERTION_TYPE, ORGANIZATION_WILDCARD};
pub use generator::{GeneratedToken, Generator, GeneratorOptions, SigningKey};
pub use jwks::{
    cache_key, certificate_to_pem, key_set_from_slice, JwksFetcher, JwksOptions, KeySet,
    KeySetCache, KeySetProvider, MemoryCache,
};
pub use parser::Parser;
pub use token::{Token, TokenType};
pub use types::{Algorithm, Claims, Headers, ValidationOptions};
pub use validator::ClaimsValidator;
pub use verifier::Verifier;
