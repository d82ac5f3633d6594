use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    middleware::NavState,
    models::{BookingRecord, TicketType},
    services::{navigation, selection::validate_selection},
    views::selector::{self, SelectorView},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(show_selector).post(select_tickets))
}

// GET /
async fn show_selector(State(state): State<Arc<AppState>>, NavState(nav): NavState) -> Response {
    // coming "Back" from the attendee screen keeps the earlier choice
    let selection = nav.as_ref().and_then(BookingRecord::selection);
    selector::render(&SelectorView {
        event: &state.event,
        selected: selection.map(|s| s.ticket_type),
        quantity: selection.map(|s| s.num_tickets).unwrap_or(1),
        alert: None,
    })
    .into_response()
}

// POST /
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionForm {
    ticket_type: Option<String>,
    num_tickets: Option<String>,
}

async fn select_tickets(State(state): State<Arc<AppState>>, Form(form): Form<SelectionForm>) -> Response {
    match validate_selection(form.ticket_type.as_deref(), form.num_tickets.as_deref()) {
        Ok(selection) => {
            info!("Navigating with selection: {} x{}", selection.ticket_type, selection.num_tickets);
            Redirect::to(&navigation::location("/attendee", &selection)).into_response()
        }
        Err(e) => {
            warn!("Ticket selection rejected: {e}");
            let alert = e.to_string();
            let page = selector::render(&SelectorView {
                event: &state.event,
                selected: form.ticket_type.as_deref().and_then(TicketType::from_id),
                quantity: form
                    .num_tickets
                    .as_deref()
                    .and_then(|q| q.trim().parse().ok())
                    .unwrap_or(1),
                alert: Some(&alert),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
        }
    }
}
