use thiserror::Error;

pub use crate::models::booking::MAX_TICKETS;
use crate::models::{TicketSelection, TicketType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select a ticket type.")]
    NoTicketType,
    #[error("Please select at least one ticket.")]
    NoTickets,
    #[error("You can book at most {MAX_TICKETS} tickets.")]
    TooManyTickets,
}

/// Gate for the selector's "Next": a known tier and 1..=5 tickets.
pub fn validate_selection(
    ticket_id: Option<&str>,
    quantity: Option<&str>,
) -> Result<TicketSelection, SelectionError> {
    let ticket_type = ticket_id
        .and_then(TicketType::from_id)
        .ok_or(SelectionError::NoTicketType)?;

    let quantity = quantity
        .and_then(|q| q.trim().parse::<i64>().ok())
        .filter(|q| *q > 0)
        .ok_or(SelectionError::NoTickets)?;
    if quantity > i64::from(MAX_TICKETS) {
        return Err(SelectionError::TooManyTickets);
    }

    Ok(TicketSelection {
        ticket_type,
        num_tickets: quantity as u8,
    })
}
