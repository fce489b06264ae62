use thiserror::Error;

/// Error type for token issuance.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Signing secret is empty")]
    EmptySecret,

    #[error("Token lifetime out of range: {0:?}")]
    InvalidTtl(std::time::Duration),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}
