//! Draft persistence.
//!
//! A booking is saved twice after the attendee step: as a structured row in
//! the draft slot (read back to pre-fill the attendee form) and as a flat
//! JSON string under a fixed key (read back by the ticket page when no
//! navigation state arrived with the request). Both adapters implement
//! [`DraftPort`]; [`DraftStore`] composes them behind one facade.

use std::future::Future;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::database::Database;
use crate::models::BookingRecord;

pub mod flat;
pub mod record;

pub use flat::FlatDraftStore;
pub use record::RecordDraftStore;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft storage failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("draft is not a valid booking record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Save/load capability over one logical draft slot.
pub trait DraftPort {
    fn save(&self, record: &BookingRecord) -> impl Future<Output = Result<(), DraftError>> + Send;
    fn load(&self) -> impl Future<Output = Result<Option<BookingRecord>, DraftError>> + Send;
}

#[derive(Clone)]
pub struct DraftStore {
    record: RecordDraftStore,
    flat: FlatDraftStore,
}

impl DraftStore {
    pub fn new(record: RecordDraftStore, flat: FlatDraftStore) -> Self {
        Self { record, flat }
    }

    pub fn from_database(db: &Database, slot: i64, fallback_key: impl Into<String>) -> Self {
        Self::new(
            RecordDraftStore::new(db.clone(), slot),
            FlatDraftStore::new(db.clone(), fallback_key),
        )
    }

    // Structured draft first, then the flat mirror; the first failure aborts
    pub async fn save(&self, record: &BookingRecord) -> Result<(), DraftError> {
        self.record.save(record).await.inspect_err(|e| {
            error!("Failed to save form data: {e}");
        })?;
        self.flat.save(record).await.inspect_err(|e| {
            error!("Failed to mirror form data: {e}");
        })?;
        debug!("Draft saved");
        Ok(())
    }

    pub async fn load_draft(&self) -> Option<BookingRecord> {
        match self.record.load().await {
            Ok(draft) => draft,
            Err(e) => {
                error!("Failed to load form data: {e}");
                None
            }
        }
    }

    // Read errors are logged and read as no draft
    pub async fn load_fallback(&self) -> Option<BookingRecord> {
        match self.flat.load().await {
            Ok(fallback) => fallback,
            Err(e) => {
                warn!("Ignoring unreadable ticket data: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::TicketType;

    pub(crate) async fn memory_db() -> Database {
        let db = Database::new("sqlite::memory:", 1).await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    pub(crate) fn ada() -> BookingRecord {
        BookingRecord {
            ticket_type: Some(TicketType::Vip),
            num_tickets: Some(2),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            about: "Looking forward!".to_string(),
            avatar_url: Some("/avatars/0b5c".to_string()),
        }
    }

    #[tokio::test]
    async fn fresh_store_has_nothing() {
        let store = DraftStore::from_database(&memory_db().await, 1, "ticketData");
        assert_eq!(store.load_draft().await, None);
        assert_eq!(store.load_fallback().await, None);
    }

    #[tokio::test]
    async fn save_writes_both_copies() {
        let store = DraftStore::from_database(&memory_db().await, 1, "ticketData");
        store.save(&ada()).await.unwrap();

        assert_eq!(store.load_draft().await, Some(ada()));
        let fallback = store.load_fallback().await.unwrap();
        assert_eq!(fallback.full_name, "Ada Lovelace");
        assert_eq!(fallback.email, "ada@example.com");
        assert_eq!(fallback.about, "Looking forward!");
        assert_eq!(fallback.ticket_type, Some(TicketType::Vip));
    }

    #[tokio::test]
    async fn corrupt_fallback_reads_as_none() {
        let db = memory_db().await;
        sqlx::query("INSERT INTO local_storage (key, value) VALUES ('ticketData', '{not json')")
            .execute(&db.pool)
            .await
            .unwrap();
        let store = DraftStore::from_database(&db, 1, "ticketData");
        assert_eq!(store.load_fallback().await, None);
    }

    #[tokio::test]
    async fn save_fails_when_tables_are_missing() {
        let db = Database::new("sqlite::memory:", 1).await.unwrap();
        let store = DraftStore::from_database(&db, 1, "ticketData");
        assert!(matches!(store.save(&ada()).await, Err(DraftError::Database(_))));
        assert_eq!(store.load_draft().await, None);
    }
}
