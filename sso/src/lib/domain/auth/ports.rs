use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `email` - Non-empty email as supplied by the client
    /// * `password` - Non-empty plaintext password
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Internal` - Store, hashing or signing failure
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Register a new credential pair.
    ///
    /// # Arguments
    /// * `email` - Non-empty email as supplied by the client
    /// * `password` - Non-empty plaintext password (hashed before storage)
    ///
    /// # Returns
    /// Identifier assigned by the store
    ///
    /// # Errors
    /// * `UserExists` - Email is already registered
    /// * `Internal` - Hashing or store failure
    async fn register_new_user(&self, email: &str, password: &str) -> Result<UserId, AuthError>;
}

/// Write side of the credential store.
#[async_trait]
pub trait UserSaver: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// Uniqueness of `email` must be enforced atomically by the store itself,
    /// as part of the insert.
    ///
    /// # Returns
    /// Newly assigned user ID
    ///
    /// # Errors
    /// * `UserExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StorageError>;
}

/// Read side of the credential store.
#[async_trait]
pub trait UserProvider: Send + Sync + 'static {
    /// Retrieve a user by exact email.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `DatabaseError` - Database operation failed
    async fn user(&self, email: &str) -> Result<User, StorageError>;
}
