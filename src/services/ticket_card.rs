use sha2::{Digest, Sha256};

use crate::models::booking::ticket_quantity;
use crate::models::{BookingRecord, Event};

pub const MISSING_VALUE: &str = "N/A";
pub const DEFAULT_TIER_LABEL: &str = "VIP";
pub const ABOUT_PLACEHOLDER: &str =
    "Nil ? Or the users sad story they write in here gets this whole space, Max of three rows";
pub const BARCODE_BARS: usize = 30;

const ABOUT_LINE_CHARS: usize = 44;
const ABOUT_MAX_LINES: usize = 3;

// Ticket fields with placeholders substituted, shared by the page and the PNG
#[derive(Debug, Clone, PartialEq)]
pub struct TicketCard {
    pub title: String,
    pub venue: String,
    pub when: String,
    pub full_name: String,
    pub email: String,
    pub ticket_type: String,
    pub num_tickets: u8,
    pub about: String,
    pub avatar_url: Option<String>,
    // opacity per bar, 0.5..=1.0
    pub barcode: [f32; BARCODE_BARS],
}

impl TicketCard {
    pub fn new(record: &BookingRecord, event: &Event) -> Self {
        TicketCard {
            title: event.title.to_string(),
            venue: event.venue.to_string(),
            when: event.when(),
            full_name: or_missing(&record.full_name, MISSING_VALUE),
            email: or_missing(&record.email, MISSING_VALUE),
            ticket_type: record
                .ticket_type
                .map(|ticket| ticket.label().to_string())
                .unwrap_or_else(|| DEFAULT_TIER_LABEL.to_string()),
            num_tickets: record.num_tickets.and_then(ticket_quantity).unwrap_or(1),
            about: or_missing(&record.about, ABOUT_PLACEHOLDER),
            avatar_url: record.avatar_url.clone().filter(|url| !url.is_empty()),
            barcode: barcode(record),
        }
    }

    pub fn about_lines(&self) -> Vec<String> {
        wrap(&self.about, ABOUT_LINE_CHARS, ABOUT_MAX_LINES)
    }
}

fn or_missing(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

// Stable per attendee, so re-downloading yields the same image
fn barcode(record: &BookingRecord) -> [f32; BARCODE_BARS] {
    let mut hasher = Sha256::new();
    hasher.update(record.full_name.as_bytes());
    hasher.update([0]);
    hasher.update(record.email.as_bytes());
    hasher.update([0]);
    hasher.update(record.ticket_type.map(|t| t.label()).unwrap_or_default().as_bytes());
    let digest = hasher.finalize();

    let mut bars = [1.0f32; BARCODE_BARS];
    for (bar, byte) in bars.iter_mut().zip(digest.iter()) {
        *bar = 0.5 + f32::from(*byte) / 255.0 * 0.5;
    }
    bars
}

// Greedy wrap; overlong words are split, overflow ends in an ellipsis
pub fn wrap(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let mut kept: String = last.chars().take(width.saturating_sub(1)).collect();
            kept.push('…');
            *last = kept;
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketType;

    #[test]
    fn missing_fields_get_placeholders() {
        let card = TicketCard::new(&BookingRecord::default(), &Event::techember());
        assert_eq!(card.full_name, "N/A");
        assert_eq!(card.email, "N/A");
        assert_eq!(card.ticket_type, "VIP");
        assert_eq!(card.num_tickets, 1);
        assert_eq!(card.about, ABOUT_PLACEHOLDER);
        assert_eq!(card.avatar_url, None);
    }

    #[test]
    fn out_of_range_quantity_shows_one() {
        for n in [0, 6, 200] {
            let record = BookingRecord { num_tickets: Some(n), ..Default::default() };
            assert_eq!(TicketCard::new(&record, &Event::techember()).num_tickets, 1);
        }
    }

    #[test]
    fn record_values_are_shown_verbatim() {
        let record = BookingRecord {
            ticket_type: Some(TicketType::Vvip),
            num_tickets: Some(3),
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            about: "Looking forward!".into(),
            avatar_url: Some("/avatars/1".into()),
        };
        let card = TicketCard::new(&record, &Event::techember());
        assert_eq!(card.full_name, "Ada Lovelace");
        assert_eq!(card.ticket_type, "VVIP ACCESS");
        assert_eq!(card.num_tickets, 3);
        assert_eq!(card.about_lines(), vec!["Looking forward!".to_string()]);
        assert_eq!(card.title, "Techember Fest '25");
    }

    #[test]
    fn barcode_is_deterministic_and_in_range() {
        let record = BookingRecord { full_name: "Ada".into(), ..Default::default() };
        let a = TicketCard::new(&record, &Event::techember()).barcode;
        let b = TicketCard::new(&record, &Event::techember()).barcode;
        assert_eq!(a, b);
        assert!(a.iter().all(|bar| (0.5..=1.0).contains(bar)));

        let other = BookingRecord { full_name: "Grace".into(), ..Default::default() };
        assert_ne!(a, TicketCard::new(&other, &Event::techember()).barcode);
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("one two three", 7, 3), vec!["one two", "three"]);
        assert_eq!(wrap("   ", 10, 3), Vec::<String>::new());
    }

    #[test]
    fn wrap_splits_long_words_and_caps_lines() {
        assert_eq!(wrap("abcdefghij", 4, 5), vec!["abcd", "efgh", "ij"]);
        let lines = wrap(&"word ".repeat(40), 10, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with('…'));
        assert!(lines[2].chars().count() <= 10);
    }
}
