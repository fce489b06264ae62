use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenIssuer;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

// Verified when the email is unknown so both failure paths cost one argon2 run.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-users";

/// Domain service implementation for authentication.
///
/// Holds only immutable settings and store handles; every call is independent.
pub struct AuthService<S, P>
where
    S: UserSaver,
    P: UserProvider,
{
    user_saver: Arc<S>,
    user_provider: Arc<P>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_ttl: Duration,
    dummy_hash: String,
}

impl<S, P> AuthService<S, P>
where
    S: UserSaver,
    P: UserProvider,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_saver` - Store write capability
    /// * `user_provider` - Store read capability
    /// * `password_hasher` - Configured password hasher
    /// * `token_issuer` - Token issuer holding the signing secret
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Errors
    /// * `HashingFailed` - The hasher cannot produce hashes
    pub fn new(
        user_saver: Arc<S>,
        user_provider: Arc<P>,
        password_hasher: PasswordHasher,
        token_issuer: TokenIssuer,
        token_ttl: Duration,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = password_hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            user_saver,
            user_provider,
            password_hasher,
            token_issuer,
            token_ttl,
            dummy_hash,
        })
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();

        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .context("password hashing task failed")?
            .context("failed to hash password")?;

        Ok(hash)
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();

        let is_valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .context("password verification task failed")?
            .context("failed to verify password")?;

        Ok(is_valid)
    }
}

#[async_trait]
impl<S, P> AuthServicePort for AuthService<S, P>
where
    S: UserSaver,
    P: UserProvider,
{
    #[tracing::instrument(skip_all, fields(op = "auth.login", email = %email))]
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = match self.user_provider.user(email).await {
            Ok(user) => Some(user),
            Err(StorageError::UserNotFound(_)) => None,
            Err(e) => {
                let err = AuthError::Internal(anyhow::Error::new(e).context("failed to get user"));
                tracing::error!(kind = err.kind(), error = %err, "Failed to get user");
                return Err(err);
            }
        };

        let stored_hash = user
            .as_ref()
            .map_or(self.dummy_hash.as_str(), |u| u.password_hash.as_str());

        let is_valid = self
            .verify_password(password, stored_hash)
            .await
            .inspect_err(|e| {
                tracing::error!(kind = e.kind(), error = %e, "Failed to verify password")
            })?;

        let Some(user) = user else {
            let err = AuthError::InvalidCredentials;
            tracing::warn!(kind = err.kind(), "User not found");
            return Err(err);
        };

        if !is_valid {
            let err = AuthError::InvalidCredentials;
            tracing::warn!(kind = err.kind(), user_id = %user.id, "Invalid password");
            return Err(err);
        }

        let token = self
            .token_issuer
            .issue(user.id.0, &user.email, self.token_ttl)
            .map_err(|e| {
                let err =
                    AuthError::Internal(anyhow::Error::new(e).context("failed to create token"));
                tracing::error!(kind = err.kind(), error = %err, "Failed to create token");
                err
            })?;

        tracing::info!(user_id = %user.id, "Successfully logged in");

        Ok(token)
    }

    #[tracing::instrument(skip_all, fields(op = "auth.register_new_user", email = %email))]
    async fn register_new_user(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let password_hash = self
            .hash_password(password)
            .await
            .inspect_err(|e| {
                tracing::error!(kind = e.kind(), error = %e, "Failed to hash password")
            })?;

        match self.user_saver.save_user(email, &password_hash).await {
            Ok(id) => {
                tracing::info!(user_id = %id, "User registered");
                Ok(id)
            }
            Err(StorageError::UserExists(_)) => {
                let err = AuthError::UserExists;
                tracing::warn!(kind = err.kind(), "User already exists");
                Err(err)
            }
            Err(e) => {
                let err = AuthError::Internal(anyhow::Error::new(e).context("failed to save user"));
                tracing::error!(kind = err.kind(), error = %err, "Failed to save user");
                Err(err)
            }
        }
    }
}
