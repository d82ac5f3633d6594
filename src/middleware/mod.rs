use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::models::BookingRecord;
use crate::services::navigation;

/// Booking copy carried by a forward navigation, if any.
///
/// Never rejects: absent or undecodable state both read as `None`, the
/// screens then fall back to what they persisted.
#[derive(Debug, Clone, Default)]
pub struct NavState(pub Option<BookingRecord>);

impl<S> FromRequestParts<S> for NavState
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        Ok(NavState(navigation::decode_state(query)))
    }
}
