//! Token issuer implementation
//!
//! Signs ES256 tokens for the reports API and caches them until expiry.

use super::types::{token_lifetime, CachedToken, Clock, Credentials, SystemClock, AUDIENCE};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    pub exp: i64,
    pub aud: String,
}

/// Issues signed bearer tokens, reusing the cached one until it expires.
///
/// The check-and-regenerate path runs under the write lock, so concurrent
/// callers racing past an expired token sign only once.
pub struct TokenIssuer {
    credentials: Credentials,
    cached_token: RwLock<Option<CachedToken>>,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer reading time from the system clock
    pub fn new(credentials: Credentials) -> Self {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    /// Create an issuer with a custom clock
    pub fn with_clock(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            cached_token: RwLock::new(None),
            clock,
        }
    }

    /// Get a valid token, signing a new one if none is cached or the cached one expired
    pub async fn current_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.is_valid_at(self.clock.now()) {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the lock
        let now = self.clock.now();
        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(now) {
                return Ok(token.token.clone());
            }
        }

        // A failed signing leaves the old entry in place
        let new_token = self.sign(now)?;
        let token_str = new_token.token.clone();
        debug!(
            key_id = %self.credentials.key_id(),
            expires_at = %new_token.expires_at,
            "Signed new reports API token"
        );
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Build and sign a token valid from `now`
    fn sign(&self, now: DateTime<Utc>) -> Result<CachedToken> {
        let expires_at = now + token_lifetime();

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.credentials.key_id().to_string());
        header.typ = Some("JWT".to_string());

        let claims = TokenClaims {
            iss: self.credentials.issuer_id().to_string(),
            exp: expires_at.timestamp(),
            aud: AUDIENCE.to_string(),
        };

        let jwt = encode(&header, &claims, self.credentials.private_key())
            .map_err(|e| Error::signing(e.to_string()))?;

        Ok(CachedToken::new(jwt, expires_at))
    }

    /// Expiry of the cached token, if one has been issued
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.cached_token.read().await.as_ref().map(|t| t.expires_at)
    }

    /// Clear the cached token, forcing a new signature on the next call
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
