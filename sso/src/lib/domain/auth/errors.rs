use thiserror::Error;

/// Errors reported by a credential store adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Top-level error for authentication operations.
///
/// `InvalidCredentials` covers both an unknown email and a wrong password.
/// `Internal` carries the cause for server-side logs only.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Short, stable name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::UserExists => "user_exists",
            AuthError::Internal(_) => "internal",
        }
    }
}
