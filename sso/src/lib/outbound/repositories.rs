pub mod memory;
pub mod postgres;
pub mod sqlite;

pub use memory::InMemoryUserRepository;
pub use postgres::PostgresUserRepository;
pub use sqlite::SqliteUserRepository;

use crate::domain::auth::errors::StorageError;

/// Map a sqlx error raised by an insert, turning a unique violation into `UserExists`.
fn map_insert_error(err: sqlx::Error, email: &str) -> StorageError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return StorageError::UserExists(email.to_string());
        }
    }
    StorageError::DatabaseError(err.to_string())
}

/// Map a sqlx error raised by a lookup by email.
fn map_select_error(err: sqlx::Error, email: &str) -> StorageError {
    match err {
        sqlx::Error::RowNotFound => StorageError::UserNotFound(email.to_string()),
        e => StorageError::DatabaseError(e.to_string()),
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
}

impl From<UserRow> for crate::domain::auth::models::User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into(),
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}
