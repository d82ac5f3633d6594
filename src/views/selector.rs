use axum::response::Html;
use std::fmt::Write as _;

use super::{alert, escape, page, progress};
use crate::models::{Event, TicketType, TICKET_TIERS};
use crate::services::selection::MAX_TICKETS;

pub struct SelectorView<'a> {
    pub event: &'a Event,
    pub selected: Option<TicketType>,
    pub quantity: u8,
    pub alert: Option<&'a str>,
}

pub fn render(view: &SelectorView<'_>) -> Html<String> {
    let mut body = progress(1, "Ticket Selection");
    body.push_str(&alert(view.alert));
    let _ = write!(
        body,
        r#"<section><h2>{}</h2><p>{}</p><p>📍 {} | {}</p></section>"#,
        escape(view.event.title),
        escape(view.event.tagline),
        escape(view.event.venue),
        escape(&view.event.when()),
    );

    body.push_str(r#"<form method="post" action="/"><fieldset><legend>Select Ticket Type</legend><div class="tiers">"#);
    for tier in TICKET_TIERS {
        let checked = if view.selected == Some(tier.ticket_type) { " checked" } else { "" };
        let _ = write!(
            body,
            r#"<label class="tier"><input type="radio" name="ticketType" value="{id}"{checked} aria-label="Select {label}"><small>{label}</small><strong>{price}</strong><small>Limit: {limit}</small></label>"#,
            id = tier.ticket_type.id(),
            label = escape(tier.ticket_type.label()),
            price = escape(tier.price),
            limit = tier.limit,
        );
    }
    body.push_str(r#"</div></fieldset><label for="numTickets">Number of Tickets</label><select id="numTickets" name="numTickets" aria-label="Select number of tickets">"#);
    for n in 1..=MAX_TICKETS {
        let selected = if n == view.quantity { " selected" } else { "" };
        let _ = write!(body, r#"<option value="{n}"{selected}>{n}</option>"#);
    }
    body.push_str(r#"</select><div class="actions"><a class="button secondary" href="/">Cancel</a><button type="submit">Next</button></div></form>"#);

    page("Ticket Selection", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_tier_and_keeps_choices() {
        let event = Event::techember();
        let Html(html) = render(&SelectorView {
            event: &event,
            selected: Some(TicketType::Vvip),
            quantity: 3,
            alert: Some("Please select a ticket type."),
        });
        for tier in TICKET_TIERS {
            assert!(html.contains(tier.ticket_type.label()));
        }
        assert!(html.contains(r#"value="vvip" checked"#));
        assert!(html.contains(r#"<option value="3" selected>3</option>"#));
        assert!(html.contains("Please select a ticket type."));
        assert!(html.contains("Step 1/3"));
    }
}
