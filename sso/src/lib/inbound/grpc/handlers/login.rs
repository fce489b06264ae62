use std::sync::Arc;

use tonic::Status;

use super::require_credentials;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login<A: AuthServicePort>(
    service: Arc<A>,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    require_credentials(&request.email, &request.password)?;

    let token = service.login(&request.email, &request.password).await?;

    Ok(LoginResponse { token })
}
