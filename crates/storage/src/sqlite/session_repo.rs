use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use super::SqliteSessionStore;
use crate::repository::{SessionKey, SessionStore, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT value
            FROM session_entries
            WHERE session_id = ?1 AND key = ?2
            ",
        )
        .bind(self.session_id.as_uuid().to_string())
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        row.try_get::<String, _>("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO session_entries (session_id, key, value, written_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(session_id, key) DO UPDATE SET
                value = excluded.value,
                written_at = excluded.written_at
            ",
        )
        .bind(self.session_id.as_uuid().to_string())
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        tracing::debug!(%key, bytes = value.len(), "session entry written");
        Ok(())
    }

    async fn remove(&self, key: SessionKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_entries WHERE session_id = ?1 AND key = ?2")
            .bind(self.session_id.as_uuid().to_string())
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_entries WHERE session_id = ?1")
            .bind(self.session_id.as_uuid().to_string())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
