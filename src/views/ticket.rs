use axum::response::Html;
use std::fmt::Write as _;

use super::{escape, page};
use crate::services::ticket_card::TicketCard;

pub const NO_DATA: &str = "No ticket data available.";

pub fn no_data() -> Html<String> {
    page("Ticket", &format!("<p>{NO_DATA}</p>"))
}

pub fn render(card: &TicketCard, download_href: &str) -> Html<String> {
    let mut body = String::from(
        "<h1>Your Ticket is Booked!</h1><p>Check your email for a copy or you can download it below.</p>",
    );
    let _ = write!(
        body,
        r#"<div class="ticket" id="ticket"><h2>{}</h2><p>📍 {}<br>📅 {}</p>"#,
        escape(&card.title),
        escape(&card.venue),
        escape(&card.when),
    );
    if let Some(src) = &card.avatar_url {
        let _ = write!(
            body,
            r#"<div class="drop"><img src="{}" alt="Avatar"></div>"#,
            escape(src)
        );
    }
    let _ = write!(
        body,
        r#"<div class="grid"><p><small>Enter your name</small><br><strong>{}</strong></p><p><small>Enter your email *</small><br><strong>{}</strong></p><p><small>Ticket Type:</small><br><strong>{}</strong></p><p><small>Ticket for:</small><br><strong>{}</strong></p><p style="grid-column:span 2"><small>Special request?</small><br><strong>{}</strong></p></div>"#,
        escape(&card.full_name),
        escape(&card.email),
        escape(&card.ticket_type),
        card.num_tickets,
        escape(&card.about),
    );

    body.push_str(r#"<div style="background:#fff;padding:8px;margin-top:16px;border-radius:4px;text-align:center">"#);
    for opacity in card.barcode {
        let _ = write!(
            body,
            r#"<span style="display:inline-block;width:4px;height:32px;margin:0 1px;background:#000;opacity:{opacity:.3}"></span>"#
        );
    }
    body.push_str("</div>");

    let _ = write!(
        body,
        r#"<div class="actions"><a class="button secondary" href="/">Book Another Ticket</a><a class="button" href="{}" download="my_ticket.png">Download Ticket</a></div></div>"#,
        escape(download_href)
    );

    page("Your Ticket", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingRecord, Event};

    #[test]
    fn no_data_page_has_only_the_notice() {
        let Html(html) = no_data();
        assert!(html.contains("<p>No ticket data available.</p>"));
        assert!(!html.contains("Download Ticket"));
    }

    #[test]
    fn ticket_shows_card_values() {
        let record = BookingRecord { full_name: "Ada <3".into(), ..Default::default() };
        let card = TicketCard::new(&record, &Event::techember());
        let Html(html) = render(&card, "/ticket/download?fullName=Ada");
        assert!(html.contains("Ada &lt;3"));
        assert!(html.contains("<strong>N/A</strong>"));
        assert!(html.contains("<strong>VIP</strong>"));
        assert!(html.contains(r#"href="/ticket/download?fullName=Ada""#));
        assert_eq!(html.matches("opacity:").count(), 30);
    }
}
