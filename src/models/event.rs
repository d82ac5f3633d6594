use chrono::{NaiveDate, NaiveDateTime};

use super::TicketType;

/// The one event this wizard books tickets for.
#[derive(Debug, Clone)]
pub struct Event {
    pub title: &'static str,
    pub tagline: &'static str,
    pub venue: &'static str,
    pub datetime_start: NaiveDateTime,
}

impl Event {
    pub fn techember() -> Self {
        let datetime_start = NaiveDate::from_ymd_opt(2025, 3, 15)
            .and_then(|day| day.and_hms_opt(19, 0, 0))
            .unwrap_or_default();
        Event {
            title: "Techember Fest '25",
            tagline: "Join us for an unforgettable experience! Secure your spot now.",
            venue: "04 Runners Road, Ikoyi, Lagos",
            datetime_start,
        }
    }

    /// e.g. `March 15, 2025 | 7:00 PM`
    pub fn when(&self) -> String {
        self.datetime_start.format("%B %-d, %Y | %-I:%M %p").to_string()
    }
}

// Tier card shown by the selector; `limit` is display only
#[derive(Debug, Clone, Copy)]
pub struct TicketTier {
    pub ticket_type: TicketType,
    pub price: &'static str,
    pub limit: u32,
}

pub const TICKET_TIERS: [TicketTier; 3] = [
    TicketTier { ticket_type: TicketType::Regular, price: "Free", limit: 12 },
    TicketTier { ticket_type: TicketType::Vip, price: "$150", limit: 10 },
    TicketTier { ticket_type: TicketType::Vvip, price: "$300", limit: 5 },
];
