use std::time::Duration;

/// Event key that marks an OpenID Connect back-channel logout token.
pub const BACKCHANNEL_LOGOUT_EVENT: &str = "http://schemas.openid.net/event/backchannel-logout";
/// `client_assertion_type` value to send alongside a signed client assertion.
pub const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";
/// Organization allow-list entry that accepts any organization (or none).
pub const ORGANIZATION_WILDCARD: &str = "*";

pub(crate) const JWT_TYPE: &str = "JWT";
pub(crate) const DEFAULT_LEEWAY_SECS: u64 = 60;

pub(crate) const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(600);
// Configured TTLs below this are clamped up.
pub(crate) const MIN_JWKS_CACHE_TTL: Duration = Duration::from_secs(60);
pub(crate) const DEFAULT_JWKS_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const MAX_JWKS_BODY_BYTES: usize = 1024 * 1024;

pub(crate) const DEFAULT_MIN_RSA_BITS: usize = 2048;
pub(crate) const DEFAULT_MAX_RSA_BITS: usize = 4096;

pub(crate) const DEFAULT_ASSERTION_LIFETIME: Duration = Duration::from_secs(60);
