//! Subscriber registry backed by SQLite.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::core::models::ChatId;
use crate::errors::StoreError;

#[derive(Debug, Clone)]
pub struct SubscriberStore {
    pool: SqlitePool,
}

impl SubscriberStore {
    /// Opens (creating if needed) the database at `path` and ensures the schema.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Creates the schema. Safe to call repeatedly and alongside reads.
    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscribers (
                chat_id INTEGER PRIMARY KEY,
                registered_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns `true` if the id was newly registered.
    pub async fn add(&self, id: ChatId) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO subscribers (chat_id, registered_at) VALUES (?, ?)",
        )
        .bind(id.0)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let added = result.rows_affected() > 0;
        if added {
            info!("New subscriber: {}", id);
        }
        Ok(added)
    }

    /// Returns `true` if the id was present and has been removed.
    pub async fn remove(&self, id: ChatId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM subscribers WHERE chat_id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!("Subscriber removed: {}", id);
        }
        Ok(removed)
    }

    pub async fn contains(&self, id: ChatId) -> Result<bool, StoreError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM subscribers WHERE chat_id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn all(&self) -> Result<BTreeSet<ChatId>, StoreError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT chat_id FROM subscribers")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().map(ChatId).collect())
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscribers")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
