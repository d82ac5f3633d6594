//! Navigation state: the booking copy carried forward in the query string.

use serde::Serialize;
use tracing::warn;

use crate::models::BookingRecord;

/// Picks the record the ticket page shows. Navigation state wins whenever it
/// carries anything; the persisted fallback is only consulted otherwise.
pub fn resolve_booking_record(
    nav: Option<BookingRecord>,
    fallback: Option<BookingRecord>,
) -> Option<BookingRecord> {
    nav.filter(|record| !record.is_empty())
        .or_else(|| fallback.filter(|record| !record.is_empty()))
}

/// `path` with `state` appended as its query string.
pub fn location<T: Serialize>(path: &str, state: &T) -> String {
    match serde_urlencoded::to_string(state) {
        Ok(query) if !query.is_empty() => format!("{path}?{query}"),
        Ok(_) => path.to_string(),
        Err(e) => {
            warn!("Dropping navigation state for {path}: {e}");
            path.to_string()
        }
    }
}

/// Reads navigation state back. Missing, empty or undecodable state is `None`.
pub fn decode_state(query: &str) -> Option<BookingRecord> {
    if query.is_empty() {
        return None;
    }
    match serde_urlencoded::from_str::<BookingRecord>(query) {
        Ok(mut record) => {
            record.drop_invalid_quantity();
            Some(record).filter(|record| !record.is_empty())
        }
        Err(e) => {
            warn!("Ignoring undecodable navigation state: {e}");
            None
        }
    }
}
