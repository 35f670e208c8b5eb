//! Database repository implementation

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use crate::error::DbError;

mod users;

/// Database connection and operations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        info!("Connecting to database: {}", database_url);

        let pool = SqlitePoolOptions::new().connect(database_url).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                rank INTEGER NOT NULL DEFAULT 1,
                location TEXT NOT NULL DEFAULT 'unknown',
                status TEXT NOT NULL DEFAULT 'enabled',
                is_admin INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::Migration(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_users_is_admin ON users(is_admin)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::Migration(e.to_string()))?;

        info!("Database migrations completed");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;
    use tempfile::TempDir;

    /// Open a fresh database file inside a temporary directory
    ///
    /// The directory must be kept alive for as long as the database is used.
    pub async fn temp_database() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        (dir, db)
    }
}
