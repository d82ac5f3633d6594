use tracing::debug;

use super::{DraftError, DraftPort};
use crate::database::Database;
use crate::models::BookingRecord;

// Record as one JSON string under a fixed key
#[derive(Clone)]
pub struct FlatDraftStore {
    db: Database,
    key: String,
}

impl FlatDraftStore {
    pub fn new(db: Database, key: impl Into<String>) -> Self {
        Self { db, key: key.into() }
    }

    async fn get_item(&self) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT value FROM local_storage WHERE key = $1")
            .bind(&self.key)
            .fetch_optional(&self.db.pool)
            .await
    }

    async fn set_item(&self, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO local_storage (key, value) VALUES ($1, $2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(&self.key)
        .bind(value)
        .execute(&self.db.pool)
        .await?;
        Ok(())
    }
}

impl DraftPort for FlatDraftStore {
    async fn save(&self, record: &BookingRecord) -> Result<(), DraftError> {
        let value = serde_json::to_string(record)?;
        self.set_item(&value).await?;
        debug!("Mirrored draft under {:?} ({} bytes)", self.key, value.len());
        Ok(())
    }

    async fn load(&self) -> Result<Option<BookingRecord>, DraftError> {
        match self.get_item().await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }
}
