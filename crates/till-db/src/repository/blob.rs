//! # Blob Repository
//!
//! Whole-collection reads and writes against the `kv_store` table.
//!
//! ## Read-Modify-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load("products")                                                       │
//! │     │  row missing ──► []                                               │
//! │     │  row present ──► serde_json::from_str::<Vec<Product>>             │
//! │     ▼                                                                   │
//! │  caller mutates the Vec                                                 │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  save("products", &vec)                                                 │
//! │     INSERT ... ON CONFLICT(key) DO UPDATE  (one statement, atomic)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two writers racing on the same key are last-write-wins.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use till_core::Record;

/// Repository for key → JSON array blobs.
#[derive(Debug, Clone)]
pub struct BlobRepository {
    pool: SqlitePool,
}

impl BlobRepository {
    /// Creates a new BlobRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BlobRepository { pool }
    }

    /// Reads the array stored under `key`. A missing key is an empty array.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> DbResult<Vec<T>> {
        debug!(key = %key, "Loading blob");

        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(raw) = raw else {
            debug!(key = %key, "Blob not present, treating as empty");
            return Ok(Vec::new());
        };

        let items: Vec<T> = serde_json::from_str(&raw).map_err(|e| DbError::corrupt(key, e))?;
        debug!(key = %key, count = items.len(), "Blob loaded");
        Ok(items)
    }

    /// Replaces the array stored under `key`.
    pub async fn save<T: Serialize>(&self, key: &str, items: &[T]) -> DbResult<()> {
        let raw = serde_json::to_string(items).map_err(|e| DbError::corrupt(key, e))?;
        let now = Utc::now().to_rfc3339();

        debug!(key = %key, count = items.len(), bytes = raw.len(), "Saving blob");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&raw)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Reads a record collection from its fixed key.
    pub async fn load_collection<R: Record>(&self) -> DbResult<Vec<R>> {
        self.load(R::STORAGE_KEY).await
    }

    /// Replaces a record collection under its fixed key.
    pub async fn save_collection<R: Record>(&self, items: &[R]) -> DbResult<()> {
        self.save(R::STORAGE_KEY, items).await
    }

    /// Deletes the blob under `key`. Returns whether a row existed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Removing blob");

        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists stored keys in alphabetical order.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
