use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::JwtError;

/// Mints signed access tokens.
///
/// Uses HS256 (HMAC with SHA-256). Only issuance lives here: a relying party
/// validates tokens on its own with the same secret and the [`Claims`] layout.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
}

impl TokenIssuer {
    /// Create a new token issuer with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (at least 32 bytes recommended for HS256)
    ///
    /// # Errors
    /// * `EmptySecret` - Secret has zero length
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Issue a token for a user, valid for `ttl` from now.
    ///
    /// Sub-second parts of `ttl` are dropped, so `exp - iat` is always the whole
    /// number of seconds in `ttl`.
    ///
    /// # Errors
    /// * `InvalidTtl` - `ttl` is shorter than one second, or the expiry overflows
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, user_id: i64, email: &str, ttl: Duration) -> Result<String, JwtError> {
        self.issue_at(user_id, email, ttl, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let ttl_secs = i64::try_from(ttl.as_secs())
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(JwtError::InvalidTtl(ttl))?;

        let claims =
            Claims::for_user(user_id, email, now, ttl_secs).ok_or(JwtError::InvalidTtl(ttl))?;
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }
}
