//! Auth data types
//!
//! Credentials identifying the API key, the cached signed token, and the
//! clock used to decide when the token must be regenerated.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::EncodingKey;
use std::path::Path;

/// Audience claim the reports API expects
pub const AUDIENCE: &str = "appstoreconnect-v1";

/// Tokens that expire more than 20 minutes in the future are rejected by the API
pub const TOKEN_LIFETIME_MINUTES: i64 = 20;

/// Validity window of a freshly signed token
pub fn token_lifetime() -> Duration {
    Duration::minutes(TOKEN_LIFETIME_MINUTES)
}

// ============================================================================
// Credentials
// ============================================================================

/// API key identity plus the ES256 private key used for signing
#[derive(Clone)]
pub struct Credentials {
    key_id: String,
    issuer_id: String,
    private_key: EncodingKey,
}

impl Credentials {
    /// Create credentials from an already loaded signing key
    pub fn new(
        key_id: impl Into<String>,
        issuer_id: impl Into<String>,
        private_key: EncodingKey,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            issuer_id: issuer_id.into(),
            private_key,
        }
    }

    /// Create credentials from a PKCS#8 PEM encoded P-256 key (`.p8` file contents)
    pub fn from_pkcs8_pem(
        key_id: impl Into<String>,
        issuer_id: impl Into<String>,
        pem: &[u8],
    ) -> Result<Self> {
        let private_key = EncodingKey::from_ec_pem(pem)
            .map_err(|e| Error::key_load(format!("invalid EC private key: {e}")))?;
        Ok(Self::new(key_id, issuer_id, private_key))
    }

    /// Read a PKCS#8 PEM key from disk
    pub fn from_key_file(
        key_id: impl Into<String>,
        issuer_id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let pem = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_pkcs8_pem(key_id, issuer_id, &pem)
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn issuer_id(&self) -> &str {
        &self.issuer_id
    }

    pub(crate) fn private_key(&self) -> &EncodingKey {
        &self.private_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("issuer_id", &self.issuer_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Cached Token
// ============================================================================

/// Signed token with its expiration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    /// The compact encoded JWT
    pub token: String,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self { token, expires_at }
    }

    /// Token usable for requests issued at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Source of wall-clock time for token expiry decisions
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
