use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_TICKETS: u8 = 5;

// Tickets per booking: 1..=MAX_TICKETS
pub fn ticket_quantity(n: u8) -> Option<u8> {
    (1..=MAX_TICKETS).contains(&n).then_some(n)
}

/// Ticket tiers on sale. Serialized with their display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketType {
    #[serde(rename = "REGULAR ACCESS")]
    Regular,
    #[serde(rename = "VIP ACCESS")]
    Vip,
    #[serde(rename = "VVIP ACCESS")]
    Vvip,
}

impl TicketType {
    pub const ALL: [TicketType; 3] = [TicketType::Regular, TicketType::Vip, TicketType::Vvip];

    /// Short id used by the selector form.
    pub fn id(self) -> &'static str {
        match self {
            TicketType::Regular => "free",
            TicketType::Vip => "vip",
            TicketType::Vvip => "vvip",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ticket| ticket.id() == id.trim())
    }

    pub fn label(self) -> &'static str {
        match self {
            TicketType::Regular => "REGULAR ACCESS",
            TicketType::Vip => "VIP ACCESS",
            TicketType::Vvip => "VVIP ACCESS",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the ticket selector: the subset of a booking it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSelection {
    pub ticket_type: TicketType,
    pub num_tickets: u8,
}

/// Everything the wizard collects, threaded by value from screen to screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<TicketType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_tickets: Option<u8>,
    pub full_name: String,
    pub email: String,
    pub about: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl BookingRecord {
    pub fn is_empty(&self) -> bool {
        self.ticket_type.is_none()
            && self.num_tickets.is_none()
            && self.full_name.is_empty()
            && self.email.is_empty()
            && self.about.is_empty()
            && self.avatar_url.as_deref().is_none_or(str::is_empty)
    }

    pub fn selection(&self) -> Option<TicketSelection> {
        Some(TicketSelection {
            ticket_type: self.ticket_type?,
            num_tickets: self.num_tickets.and_then(ticket_quantity)?,
        })
    }

    // Drops a quantity that arrived from outside the selector out of range
    pub fn drop_invalid_quantity(&mut self) {
        self.num_tickets = self.num_tickets.and_then(ticket_quantity);
    }

    /// Overwrites the ticket fields with a fresh selection, keeping attendee fields.
    pub fn apply_selection(&mut self, selection: TicketSelection) {
        self.ticket_type = Some(selection.ticket_type);
        self.num_tickets = Some(selection.num_tickets);
    }
}

impl From<TicketSelection> for BookingRecord {
    fn from(selection: TicketSelection) -> Self {
        let mut record = BookingRecord::default();
        record.apply_selection(selection);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_type_uses_display_labels_on_the_wire() {
        assert_eq!(serde_json::to_string(&TicketType::Vip).unwrap(), "\"VIP ACCESS\"");
        let parsed: TicketType = serde_json::from_str("\"VVIP ACCESS\"").unwrap();
        assert_eq!(parsed, TicketType::Vvip);
        assert!(serde_json::from_str::<TicketType>("\"GOLD\"").is_err());
    }

    #[test]
    fn ticket_ids_map_back_to_tiers() {
        for ticket in TicketType::ALL {
            assert_eq!(TicketType::from_id(ticket.id()), Some(ticket));
        }
        assert_eq!(TicketType::from_id("backstage"), None);
        assert_eq!(TicketType::from_id(""), None);
    }

    #[test]
    fn record_json_uses_camel_case_names() {
        let record = BookingRecord {
            ticket_type: Some(TicketType::Vip),
            num_tickets: Some(2),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            about: "Looking forward!".to_string(),
            avatar_url: Some("/avatars/abc".to_string()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ticketType"], "VIP ACCESS");
        assert_eq!(json["numTickets"], 2);
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["avatarUrl"], "/avatars/abc");
    }

    #[test]
    fn quantities_outside_one_to_five_are_dropped() {
        for n in [0, 6, 200] {
            let mut record = BookingRecord {
                ticket_type: Some(TicketType::Vip),
                num_tickets: Some(n),
                ..Default::default()
            };
            assert_eq!(record.selection(), None, "{n} should not select");
            record.drop_invalid_quantity();
            assert_eq!(record.num_tickets, None);
        }

        let mut record = BookingRecord { num_tickets: Some(5), ..Default::default() };
        record.drop_invalid_quantity();
        assert_eq!(record.num_tickets, Some(5));
    }

    #[test]
    fn partial_record_deserializes_with_defaults() {
        let record: BookingRecord =
            serde_json::from_str(r#"{"ticketType":"VIP ACCESS","numTickets":2}"#).unwrap();
        assert_eq!(
            record.selection(),
            Some(TicketSelection { ticket_type: TicketType::Vip, num_tickets: 2 })
        );
        assert!(record.full_name.is_empty());
        assert!(record.avatar_url.is_none());
    }

    #[test]
    fn empty_record_detection() {
        assert!(BookingRecord::default().is_empty());
        let blank_avatar = BookingRecord { avatar_url: Some(String::new()), ..Default::default() };
        assert!(blank_avatar.is_empty());
        let named = BookingRecord { full_name: "x".into(), ..Default::default() };
        assert!(!named.is_empty());
    }

    #[test]
    fn apply_selection_keeps_attendee_fields() {
        let mut record = BookingRecord {
            ticket_type: Some(TicketType::Regular),
            num_tickets: Some(1),
            full_name: "Grace".into(),
            ..Default::default()
        };
        record.apply_selection(TicketSelection { ticket_type: TicketType::Vvip, num_tickets: 4 });
        assert_eq!(record.ticket_type, Some(TicketType::Vvip));
        assert_eq!(record.num_tickets, Some(4));
        assert_eq!(record.full_name, "Grace");
    }
}
