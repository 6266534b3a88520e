// Rust guideline compliant 2026-10-16

//! SQLite adapter for the `KeyValueStore` port.
//!
//! One row per key in `kv_store`; every save rewrites the whole document with
//! `INSERT OR REPLACE`.

use domain::{KeyValueStore, StoreError};

/// `KeyValueStore` adapter backed by a SQLite database via `sqlx`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: sqlx::SqlitePool,
}

impl SqliteStore {
    /// Open or create a SQLite database and ensure the `kv_store` table exists.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` when the connection or schema creation fails.
    pub async fn new(db_url: &str) -> Result<Self, sqlx::Error> {
        // sqlx 0.8 does not create missing database files by default.
        let opts = db_url
            .parse::<sqlx::sqlite::SqliteConnectOptions>()?
            .create_if_missing(true);
        let pool = sqlx::SqlitePool::connect_with(opts).await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        tracing::debug!("sqlite.open: url={db_url}");
        Ok(Self { pool })
    }
}

fn unavailable(op: &str, e: &sqlx::Error) -> StoreError {
    tracing::error!("sqlite.{op}: {e}");
    StoreError::Unavailable { reason: e.to_string() }
}

impl KeyValueStore for SqliteStore {
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` on any `sqlx` error; the underlying
    /// error is logged at `error` level before mapping.
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("load", &e))
    }

    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` on any `sqlx` error; the underlying
    /// error is logged at `error` level before mapping.
    async fn save(&self, key: &str, value: String) -> Result<(), StoreError> {
        sqlx::query("INSERT OR REPLACE INTO kv_store (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("save", &e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
