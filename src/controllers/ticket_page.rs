use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    middleware::NavState,
    models::BookingRecord,
    services::{
        navigation::{self, resolve_booking_record},
        ticket_card::TicketCard,
        ticket_image::TICKET_FILE_NAME,
    },
    views::ticket,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ticket", get(show_ticket))
        .route("/ticket/download", get(download_ticket))
        .route("/avatars/{id}", get(get_avatar))
}

// Navigation state first, the flat mirror only when none arrived
async fn booking_for(state: &AppState, nav: Option<BookingRecord>) -> Option<BookingRecord> {
    let fallback = match nav {
        Some(_) => None,
        None => state.drafts.load_fallback().await,
    };
    resolve_booking_record(nav, fallback)
}

// GET /ticket
async fn show_ticket(State(state): State<Arc<AppState>>, NavState(nav): NavState) -> Response {
    let Some(record) = booking_for(&state, nav).await else {
        info!("No ticket data available");
        return ticket::no_data().into_response();
    };

    let card = TicketCard::new(&record, &state.event);
    let download = navigation::location("/ticket/download", &record);
    ticket::render(&card, &download).into_response()
}

// GET /ticket/download
async fn download_ticket(State(state): State<Arc<AppState>>, NavState(nav): NavState) -> Response {
    let Some(record) = booking_for(&state, nav).await else {
        warn!("Ticket download requested without ticket data");
        return StatusCode::NO_CONTENT.into_response();
    };

    let avatar = match record.avatar_url.as_deref() {
        Some(reference) => state.avatars.resolve(reference).await,
        None => None,
    };
    let card = TicketCard::new(&record, &state.event);

    match state.renderer.render_png(&card, avatar).await {
        Ok(png) => (
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{TICKET_FILE_NAME}\""),
                ),
            ],
            png,
        )
            .into_response(),
        Err(e) => {
            error!("Error generating ticket image: {e}");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

// GET /avatars/{id}
async fn get_avatar(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    match state.avatars.get(id).await {
        Some(avatar) => ([(header::CONTENT_TYPE, avatar.content_type)], avatar.bytes).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
