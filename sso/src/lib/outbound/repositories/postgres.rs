use std::str::FromStr;

use async_trait::async_trait;
use sqlx::migrate::Migrate;
use sqlx::migrate::MigrateError;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::postgres::PgSslMode;
use sqlx::PgPool;

use super::map_insert_error;
use super::map_select_error;
use super::UserRow;
use crate::config::PostgresConfig;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// Schema migrations embedded at build time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool from configuration.
    pub async fn connect(
        config: &PostgresConfig,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.username)
            .password(&config.password)
            .ssl_mode(PgSslMode::from_str(&config.sslmode)?);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Apply pending migrations, returning how many were applied.
    pub async fn migrate(&self, migrator: &Migrator) -> Result<usize, MigrateError> {
        let mut conn = self.pool.acquire().await?;
        conn.ensure_migrations_table().await?;
        let applied = conn.list_applied_migrations().await?;
        drop(conn);

        let pending = migrator
            .iter()
            .filter(|m| !m.migration_type.is_down_migration())
            .filter(|m| !applied.iter().any(|a| a.version == m.version))
            .count();

        migrator.run(&self.pool).await?;

        Ok(pending)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserSaver for PostgresUserRepository {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StorageError> {
        // The users_email_key unique constraint decides races between concurrent inserts.
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, email))?;

        Ok(UserId(id))
    }
}

#[async_trait]
impl UserProvider for PostgresUserRepository {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        let row: UserRow = sqlx::query_as(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_select_error(e, email))?;

        Ok(row.into())
    }
}
