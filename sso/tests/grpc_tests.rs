mod common;

use common::decode_claims;
use common::TestApp;
use common::TOKEN_TTL;
use sso::domain::auth::ports::UserProvider;
use sso::proto::LoginRequest;
use sso::proto::RegisterRequest;
use tonic::Code;

fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_register_and_login_scenario() {
    let mut app = TestApp::spawn().await;

    let user_id = app
        .client
        .register(register_request("a@example.com", "pw12345"))
        .await
        .expect("Register failed")
        .into_inner()
        .user_id;
    assert_eq!(user_id, 1);

    let token = app
        .client
        .login(login_request("a@example.com", "pw12345"))
        .await
        .expect("Login failed")
        .into_inner()
        .token;

    let claims = decode_claims(&token);
    assert_eq!(claims.sub, 1);
    assert_eq!(claims.email, "a@example.com");

    let status = app
        .client
        .login(login_request("a@example.com", "wrongpw"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);

    let status = app
        .client
        .register(register_request("a@example.com", "other"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::AlreadyExists);
}

#[tokio::test]
async fn test_login_token_lifetime() {
    let mut app = TestApp::spawn().await;

    app.client
        .register(register_request("ttl@example.com", "pw12345"))
        .await
        .expect("Register failed");

    let token = app
        .client
        .login(login_request("ttl@example.com", "pw12345"))
        .await
        .expect("Login failed")
        .into_inner()
        .token;

    let claims = decode_claims(&token);
    let ttl = TOKEN_TTL.as_secs() as i64;
    assert!((claims.exp - claims.iat - ttl).abs() <= 1);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_the_same() {
    let mut app = TestApp::spawn().await;

    app.client
        .register(register_request("a@example.com", "pw12345"))
        .await
        .expect("Register failed");

    let wrong_password = app
        .client
        .login(login_request("a@example.com", "wrongpw"))
        .await
        .unwrap_err();
    let unknown_email = app
        .client
        .login(login_request("nobody@example.com", "pw12345"))
        .await
        .unwrap_err();

    assert_eq!(wrong_password.code(), Code::Unauthenticated);
    assert_eq!(wrong_password.code(), unknown_email.code());
    assert_eq!(wrong_password.message(), unknown_email.message());
}

#[tokio::test]
async fn test_duplicate_registration_keeps_original_hash() {
    let mut app = TestApp::spawn().await;

    app.client
        .register(register_request("a@example.com", "pw12345"))
        .await
        .expect("Register failed");
    let original = app.db.repository.user("a@example.com").await.unwrap();

    let status = app
        .client
        .register(register_request("a@example.com", "other"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::AlreadyExists);

    let after = app.db.repository.user("a@example.com").await.unwrap();
    assert_eq!(after.password_hash, original.password_hash);

    // The original password still logs in, the rejected one does not
    assert!(app
        .client
        .login(login_request("a@example.com", "pw12345"))
        .await
        .is_ok());
    assert!(app
        .client
        .login(login_request("a@example.com", "other"))
        .await
        .is_err());
}

#[tokio::test]
async fn test_empty_fields_rejected() {
    let mut app = TestApp::spawn().await;

    let status = app
        .client
        .register(register_request("", "pw12345"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = app
        .client
        .register(register_request("a@example.com", ""))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = app
        .client
        .login(login_request("", "pw12345"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = app
        .client
        .login(login_request("a@example.com", ""))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    // Nothing was persisted by the rejected registrations
    assert!(app.db.repository.user("").await.is_err());
    assert!(app.db.repository.user("a@example.com").await.is_err());
}

#[tokio::test]
async fn test_emails_are_case_sensitive() {
    let mut app = TestApp::spawn().await;

    let first = app
        .client
        .register(register_request("a@example.com", "pw12345"))
        .await
        .expect("Register failed")
        .into_inner()
        .user_id;
    let second = app
        .client
        .register(register_request("A@example.com", "pw12345"))
        .await
        .expect("Register failed")
        .into_inner()
        .user_id;

    assert_ne!(first, second);
}
