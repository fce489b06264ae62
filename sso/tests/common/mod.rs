use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use auth::Claims;
use auth::PasswordHasher;
use auth::TokenIssuer;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use sso::config::SqliteConfig;
use sso::domain::auth::ports::UserProvider;
use sso::domain::auth::ports::UserSaver;
use sso::domain::auth::service::AuthService;
use sso::inbound::grpc::AuthGrpcService;
use sso::outbound::repositories::sqlite;
use sso::outbound::repositories::SqliteUserRepository;
use sso::proto::auth_client::AuthClient;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Channel;
use tonic::transport::Server;

pub const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Test application that serves the gRPC API on a random port
pub struct TestApp {
    pub client: AuthClient<Channel>,
    pub db: TestDb,
}

/// Test database helper: one SQLite file per test
pub struct TestDb {
    pub repository: Arc<SqliteUserRepository>,
    pub path: PathBuf,
}

impl TestApp {
    /// Spawn the gRPC server in a background task and connect a client to it
    pub async fn spawn() -> Self {
        let db = TestDb::new().await;
        let service = auth_service(Arc::clone(&db.repository), TOKEN_TTL);

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthGrpcService::new(service).into_server())
                .serve_with_incoming(TcpListenerStream::new(listener))
                .await
                .expect("Server error");
        });

        let client = AuthClient::connect(format!("http://{}", address))
            .await
            .expect("Failed to connect gRPC client");

        Self { client, db }
    }
}

impl TestDb {
    /// Create a fresh, migrated database file with a unique name
    pub async fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "test_sso_{}.db",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        ));

        let config = SqliteConfig {
            path: path.to_string_lossy().into_owned(),
        };

        let repository = SqliteUserRepository::connect(&config, 5)
            .await
            .expect("Failed to open test database");

        repository
            .migrate(&sqlite::MIGRATOR)
            .await
            .expect("Failed to run migrations");

        Self {
            repository: Arc::new(repository),
            path,
        }
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// Cheap argon2 parameters keep the suite fast; production costs are configured separately.
pub fn password_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("Failed to build password hasher")
}

pub fn auth_service<R>(repository: Arc<R>, token_ttl: Duration) -> Arc<AuthService<R, R>>
where
    R: UserSaver + UserProvider,
{
    Arc::new(
        AuthService::new(
            Arc::clone(&repository),
            repository,
            password_hasher(),
            TokenIssuer::new(SECRET).expect("Failed to build token issuer"),
            token_ttl,
        )
        .expect("Failed to build auth service"),
    )
}

/// Validate a token the way a relying party would, with the shared secret and claim layout
pub fn decode_claims(token: &str) -> Claims {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(SECRET),
        &Validation::new(Algorithm::HS256),
    )
    .expect("Failed to decode token")
    .claims
}
