use async_trait::async_trait;
use sqlx::migrate::Migrate;
use sqlx::migrate::MigrateError;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use super::map_insert_error;
use super::map_select_error;
use super::UserRow;
use crate::config::SqliteConfig;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// Schema migrations embedded at build time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database file from configuration.
    pub async fn connect(config: &SqliteConfig, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
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
impl UserSaver for SqliteUserRepository {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StorageError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES (?1, ?2)
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
impl UserProvider for SqliteUserRepository {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        let row: UserRow = sqlx::query_as(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_select_error(e, email))?;

        Ok(row.into())
    }
}
