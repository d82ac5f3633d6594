use chrono::Utc;
use sqlx::types::Json;
use tracing::debug;

use super::{DraftError, DraftPort};
use crate::database::Database;
use crate::models::BookingRecord;

// Record as a JSON column in a fixed row of form_data
#[derive(Clone)]
pub struct RecordDraftStore {
    db: Database,
    slot: i64,
}

impl RecordDraftStore {
    pub fn new(db: Database, slot: i64) -> Self {
        Self { db, slot }
    }
}

impl DraftPort for RecordDraftStore {
    async fn save(&self, record: &BookingRecord) -> Result<(), DraftError> {
        // upsert: the slot always holds the latest draft
        sqlx::query(
            "INSERT INTO form_data (id, data, saved_at)
             VALUES ($1, $2, $3)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data, saved_at = excluded.saved_at",
        )
        .bind(self.slot)
        .bind(Json(record))
        .bind(Utc::now())
        .execute(&self.db.pool)
        .await?;

        debug!("Stored draft in slot {}", self.slot);
        Ok(())
    }

    async fn load(&self) -> Result<Option<BookingRecord>, DraftError> {
        let row: Option<(Json<BookingRecord>,)> =
            sqlx::query_as("SELECT data FROM form_data WHERE id = $1")
                .bind(self.slot)
                .fetch_optional(&self.db.pool)
                .await?;

        Ok(row.map(|(Json(record),)| record))
    }
}
