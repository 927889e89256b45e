#![forbid(unsafe_code)]

pub mod codec;
mod error;
mod jwt;

pub use error::{ClaimError, Error, Segment};

pub use jwt::{
    cache_key, certificate_to_pem, key_set_from_slice, Algorithm, Claims, ClaimsValidator,
    ClientAssertion, GeneratedToken, Generator, GeneratorOptions, Headers, JwksFetcher,
    JwksOptions, KeySet, KeySetCache, KeySetProvider, MemoryCache, Parser, SigningKey, Token,
    TokenType, ValidationOptions, Verifier, BACKCHANNEL_LOGOUT_EVENT, CLIENT_ASSERTION_TYPE,
    ORGANIZATION_WILDCARD,
};
