use std::path::Path;

use anyhow::anyhow;
use anyhow::Context;
use clap::Arg;
use clap::Command;
use sqlx::migrate::Migrator;
use sso::config::MigrationConfig;
use sso::config::StorageKind;
use sso::outbound::repositories::postgres;
use sso::outbound::repositories::sqlite;
use sso::outbound::repositories::PostgresUserRepository;
use sso::outbound::repositories::SqliteUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn command() -> Command {
    Command::new("sso-migrator")
        .about("Apply database schema migrations for the sso service")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file, layered over default.toml beside it")
                .env("SSO_CONFIG")
                .required(true),
        )
        .arg(
            Arg::new("migrations")
                .short('m')
                .long("migrations")
                .help("Directory with migration files (defaults to the embedded set)")
                .env("SSO_MIGRATIONS"),
        )
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sso=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let matches = command().get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .context("--config is required")?;
    let config = MigrationConfig::load_from(config_path)
        .with_context(|| format!("failed to load config from {}", config_path))?;

    let custom = match matches.get_one::<String>("migrations") {
        Some(dir) => Some(
            Migrator::new(Path::new(dir))
                .await
                .with_context(|| format!("failed to read migrations from {}", dir))?,
        ),
        None => None,
    };

    let max_connections = config.storage.max_connections;

    let applied = match config.storage.kind {
        StorageKind::Postgres => {
            let postgres_config = config
                .storage
                .postgres
                .as_ref()
                .context("missing storage.postgres section")?;
            let repository =
                PostgresUserRepository::connect(postgres_config, max_connections).await?;
            let applied = repository
                .migrate(custom.as_ref().unwrap_or(&postgres::MIGRATOR))
                .await?;
            repository.close().await;
            applied
        }
        StorageKind::Sqlite => {
            let sqlite_config = config
                .storage
                .sqlite
                .as_ref()
                .context("missing storage.sqlite section")?;
            let repository = SqliteUserRepository::connect(sqlite_config, max_connections).await?;
            let applied = repository
                .migrate(custom.as_ref().unwrap_or(&sqlite::MIGRATOR))
                .await?;
            repository.close().await;
            applied
        }
        StorageKind::Memory => {
            return Err(anyhow!("storage type \"memory\" has no schema to migrate"));
        }
    };

    if applied == 0 {
        tracing::info!("There are no new migrations");
    } else {
        tracing::info!(applied, "Migrations have been successfully applied");
    }

    Ok(())
}
