use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// This layout is the contract shared with any relying party that validates
/// tokens with the same secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: i64,

    /// Email the user registered with
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for a user, issued at `issued_at` and valid for `ttl_secs`.
    ///
    /// Returns `None` when the expiry does not fit in a Unix timestamp.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `email` - User email
    /// * `issued_at` - Issuance instant
    /// * `ttl_secs` - Lifetime in seconds
    pub fn for_user(
        user_id: i64,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl_secs: i64,
    ) -> Option<Self> {
        let iat = issued_at.timestamp();
        let exp = iat.checked_add(ttl_secs)?;

        Some(Self {
            sub: user_id,
            email: email.into(),
            iat,
            exp,
        })
    }
}
