use std::sync::Arc;

use tonic::Status;

use super::require_credentials;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<A: AuthServicePort>(
    service: Arc<A>,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    require_credentials(&request.email, &request.password)?;

    let user_id = service
        .register_new_user(&request.email, &request.password)
        .await?;

    Ok(RegisterResponse { user_id: user_id.0 })
}

#[cfg(test)]
mod tests {
    use tonic::Code;

    use super::*;
    use crate::domain::auth::errors::AuthError;
    use crate::domain::auth::models::UserId;
    use crate::inbound::grpc::handlers::mocks::MockTestAuthService;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut service = MockTestAuthService::new();
        service
            .expect_register_new_user()
            .withf(|email, password| email == "a@example.com" && password == "pw12345")
            .times(1)
            .returning(|_, _| Ok(UserId(1)));

        let response = register(Arc::new(service), request("a@example.com", "pw12345"))
            .await
            .expect("Registration failed");

        assert_eq!(response.user_id, 1);
    }

    #[tokio::test]
    async fn test_register_empty_fields_never_reach_service() {
        let mut service = MockTestAuthService::new();
        service.expect_register_new_user().times(0);
        let service = Arc::new(service);

        let status = register(Arc::clone(&service), request("", "pw12345"))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "email is required");

        let status = register(service, request("a@example.com", ""))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "password is required");
    }

    #[tokio::test]
    async fn test_register_user_exists() {
        let mut service = MockTestAuthService::new();
        service
            .expect_register_new_user()
            .times(1)
            .returning(|_, _| Err(AuthError::UserExists));

        let status = register(Arc::new(service), request("a@example.com", "other"))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::AlreadyExists);
    }
}
