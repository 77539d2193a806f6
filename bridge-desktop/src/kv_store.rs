//! Key-Value Storage using SQLite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{KeyValueStore, StoredEntry, StoredValue, ValueKind},
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};
use std::path::PathBuf;
use tracing::{debug, error};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS kv_store (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        value_type TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )
"#;

/// SQLite-backed key-value store
///
/// Every entry lives in a single `kv_store` table together with its
/// [`ValueKind`], so typed reads can reject values written under a
/// different kind.
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Open (or create) a store at the given database path
    pub async fn new(db_path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to connect to DB: {}", e)))?;

        Self::create_table(&pool).await?;
        debug!(path = ?db_path, "Initialized key-value store");

        Ok(Self { pool })
    }

    /// Create an in-memory store (for testing)
    ///
    /// Pinned to a single connection: every `sqlite::memory:` connection
    /// opens its own private database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to connect to DB: {}", e)))?;

        Self::create_table(&pool).await?;
        Ok(Self { pool })
    }

    async fn create_table(pool: &SqlitePool) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(pool)
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to create table: {}", e)))?;
        Ok(())
    }

    /// Get the current Unix timestamp
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default()
    }

    fn decode_row(key: &str, row: &SqliteRow) -> Result<StoredValue> {
        let raw: String = row.get("value");
        let value_type: String = row.get("value_type");

        let kind = ValueKind::parse(&value_type).ok_or_else(|| {
            error!(key = key, value_type = %value_type, "Unknown value type");
            BridgeError::storage_read(key, format!("Unknown value type '{}'", value_type))
        })?;

        Ok(StoredValue { kind, raw })
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn set_raw(&self, key: &str, value: StoredValue) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, value_type, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                value_type = excluded.value_type,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&value.raw)
        .bind(value.kind.as_str())
        .bind(Self::now())
        .execute(&self.pool)
        .await
        .map_err(|e| BridgeError::storage_write(key, format!("Failed to store value: {}", e)))?;

        debug!(key = key, value_type = %value.kind, "Stored value");
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<StoredValue>> {
        let row = sqlx::query("SELECT key, value, value_type FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::storage_read(key, format!("Failed to load value: {}", e)))?;

        match row {
            Some(row) => {
                let value = Self::decode_row(key, &row)?;
                debug!(key = key, value_type = %value.kind, "Retrieved value");
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::storage_write(key, format!("Failed to delete: {}", e)))?;

        debug!(key = key, "Deleted value");
        Ok(())
    }

    async fn has_key(&self, key: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::storage_read(key, format!("Failed to check key: {}", e)))?;

        Ok(row.is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to list keys: {}", e)))?;

        let keys = rows.into_iter().map(|row| row.get(0)).collect();
        Ok(keys)
    }

    async fn entries(&self) -> Result<Vec<StoredEntry>> {
        let rows = sqlx::query("SELECT key, value, value_type FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to list entries: {}", e)))?;

        rows.iter()
            .map(|row| -> Result<StoredEntry> {
                let key: String = row.get("key");
                let value = Self::decode_row(&key, row)?;
                Ok(StoredEntry { key, value })
            })
            .collect()
    }

    async fn clear_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM kv_store")
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to clear store: {}", e)))?;

        debug!("Cleared key-value store");
        Ok(())
    }
}
