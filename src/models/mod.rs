pub mod attendee;
pub mod booking;
pub mod event;

pub use attendee::{AttendeeField, AttendeeForm, FieldErrors};
pub use booking::{BookingRecord, TicketSelection, TicketType};
pub use event::{Event, TicketTier, TICKET_TIERS};
