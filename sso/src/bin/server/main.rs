use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth::PasswordHasher;
use auth::TokenIssuer;
use sso::config::Config;
use sso::config::StorageKind;
use sso::domain::auth::ports::UserProvider;
use sso::domain::auth::ports::UserSaver;
use sso::domain::auth::service::AuthService;
use sso::inbound::grpc::AuthGrpcService;
use sso::outbound::repositories::InMemoryUserRepository;
use sso::outbound::repositories::PostgresUserRepository;
use sso::outbound::repositories::SqliteUserRepository;
use sso::telemetry;
use tokio::signal;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    telemetry::init(config.env, &config.log)?;

    tracing::info!(
        service = "sso",
        version = env!("CARGO_PKG_VERSION"),
        env = ?config.env,
        "Service starting"
    );

    tracing::info!(
        grpc_port = config.grpc.port,
        grpc_timeout_secs = config.grpc.timeout_secs,
        token_ttl_secs = config.jwt.token_ttl_secs,
        storage = ?config.storage.kind,
        "Configuration loaded"
    );

    let max_connections = config.storage.max_connections;

    match config.storage.kind {
        StorageKind::Postgres => {
            let postgres = config
                .storage
                .postgres
                .as_ref()
                .context("missing storage.postgres section")?;
            let repository =
                Arc::new(PostgresUserRepository::connect(postgres, max_connections).await?);
            tracing::info!(
                max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            serve(Arc::clone(&repository), &config).await?;

            repository.close().await;
            tracing::info!(database = "postgresql", "Database connection pool closed");
        }
        StorageKind::Sqlite => {
            let sqlite = config
                .storage
                .sqlite
                .as_ref()
                .context("missing storage.sqlite section")?;
            let repository =
                Arc::new(SqliteUserRepository::connect(sqlite, max_connections).await?);
            tracing::info!(
                max_connections,
                database = "sqlite",
                path = %sqlite.path,
                "Database connection pool created"
            );

            serve(Arc::clone(&repository), &config).await?;

            repository.close().await;
            tracing::info!(database = "sqlite", "Database connection pool closed");
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage, users are lost on shutdown");
            serve(Arc::new(InMemoryUserRepository::new()), &config).await?;
        }
    }

    tracing::info!("Application stopped");

    Ok(())
}

async fn serve<R>(repository: Arc<R>, config: &Config) -> Result<(), anyhow::Error>
where
    R: UserSaver + UserProvider,
{
    let password_hasher = PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let token_issuer = TokenIssuer::new(config.jwt.secret.as_bytes())?;

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&repository),
        repository,
        password_hasher,
        token_issuer,
        config.token_ttl(),
    )?);

    let grpc_address: SocketAddr = format!("0.0.0.0:{}", config.grpc.port).parse()?;
    let grpc_service = AuthGrpcService::new(auth_service);
    tracing::info!(
        address = %grpc_address,
        port = config.grpc.port,
        protocol = "grpc",
        "gRpc server listening"
    );

    Server::builder()
        .timeout(config.request_timeout())
        .trace_fn(|request| tracing::info_span!("grpc_request", method = %request.uri().path()))
        .add_service(grpc_service.into_server())
        .serve_with_shutdown(grpc_address, shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "SIGINT", "Stopping application"),
        _ = terminate => tracing::info!(signal = "SIGTERM", "Stopping application"),
    }
}
