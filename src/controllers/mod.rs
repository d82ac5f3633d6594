pub mod attendee;
pub mod ticket_page;
pub mod tickets;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(tickets::routes())
        .merge(attendee::routes())
        .merge(ticket_page::routes())
}
