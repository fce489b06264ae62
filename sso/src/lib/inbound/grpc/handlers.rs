use tonic::Status;

use crate::domain::auth::errors::AuthError;

pub mod login;
pub mod register;

/// Translate domain errors into gRPC statuses.
///
/// Internal failures never expose their cause to the caller.
impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Status::unauthenticated("invalid email or password"),
            AuthError::UserExists => Status::already_exists("user already exists"),
            AuthError::Internal(_) => Status::internal("internal error"),
        }
    }
}

/// Presence check shared by every request carrying credentials.
fn require_credentials(email: &str, password: &str) -> Result<(), Status> {
    if email.is_empty() {
        return Err(Status::invalid_argument("email is required"));
    }
    if password.is_empty() {
        return Err(Status::invalid_argument("password is required"));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use tonic::Code;

    use super::*;

    #[test]
    fn test_error_mapping() {
        let status = Status::from(AuthError::InvalidCredentials);
        assert_eq!(status.code(), Code::Unauthenticated);

        let status = Status::from(AuthError::UserExists);
        assert_eq!(status.code(), Code::AlreadyExists);

        let status = Status::from(AuthError::Internal(anyhow!("pool timed out on 10.0.0.3")));
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "internal error");
    }

    #[test]
    fn test_require_credentials() {
        assert!(require_credentials("a@example.com", "pw").is_ok());

        let status = require_credentials("", "pw").unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "email is required");

        let status = require_credentials("a@example.com", "").unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "password is required");
    }
}
