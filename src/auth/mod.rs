//! Authentication module
//!
//! App Store Connect authenticates every request with a short-lived ES256
//! JWT signed by the caller's API key. The `TokenIssuer` signs these tokens
//! and caches each one until it expires.

mod issuer;
mod types;

pub use issuer::{TokenClaims, TokenIssuer};
pub use types::{
    token_lifetime, CachedToken, Clock, Credentials, SystemClock, AUDIENCE, TOKEN_LIFETIME_MINUTES,
};
