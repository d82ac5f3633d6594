//! Server-rendered pages. Thin markup over the wizard's view models.

use axum::response::Html;

pub mod attendee;
pub mod selector;
pub mod ticket;

const STYLE: &str = "body{margin:0;background:#02191D;color:#E5E7EB;font-family:sans-serif}\
header{display:flex;justify-content:space-between;max-width:960px;margin:12px auto;padding:12px;border:1px solid #197686;border-radius:12px}\
main{max-width:560px;margin:24px auto;padding:24px;border:1px solid #0E464F;border-radius:16px}\
.alert{background:#7F1D1D;color:#fff;padding:12px;border-radius:8px;margin-bottom:16px}\
.notice{background:#134E4A;color:#fff;padding:12px;border-radius:8px;margin-bottom:16px}\
.error{color:#F87171;font-size:0.85em}\
.progress{height:4px;background:#0E464F;border-radius:2px}.progress>div{height:4px;background:#24A0B5}\
.tiers{display:grid;grid-template-columns:repeat(3,1fr);gap:12px}\
.tier{border:1px solid #197686;border-radius:8px;padding:12px;display:block}\
.drop{border:2px dashed #197686;border-radius:12px;padding:24px;text-align:center}\
.drop img{width:128px;height:128px;object-fit:cover;border-radius:8px}\
.ticket{background:#0E464F;border-radius:16px;padding:24px}\
.grid{display:grid;grid-template-columns:1fr 1fr;gap:12px;background:#133D44;padding:16px;border-radius:8px}\
.actions{display:flex;justify-content:space-between;gap:12px;margin-top:24px}\
a.button,button{padding:10px 18px;border-radius:8px;border:1px solid #24A0B5;background:#24A0B5;color:#fff;text-decoration:none}\
a.secondary,button.secondary{background:transparent}\
input,textarea,select{width:100%;box-sizing:border-box;padding:8px;background:transparent;color:#E5E7EB;border:1px solid #197686;border-radius:8px}";

/// Escapes text for HTML and SVG content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps a screen in the site shell.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · ticz</title>
<style>{STYLE}</style>
</head>
<body>
<header><strong>ticz</strong><nav>Events · My tickets · About project</nav><a class="button" href="/">My Tickets →</a></header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    ))
}

/// Blocking summary alert shown at the top of a screen.
pub fn alert(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(r#"<div class="alert" role="alert">{}</div>"#, escape(message)),
        None => String::new(),
    }
}

pub fn progress(step: u8, title: &str) -> String {
    let percent = u32::from(step) * 100 / 3;
    format!(
        r#"<div><h1>{}</h1><span>Step {step}/3</span><div class="progress"><div style="width:{percent}%"></div></div></div>"#,
        escape(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn alert_is_empty_without_message() {
        assert_eq!(alert(None), "");
        assert!(alert(Some("Nope")).contains(r#"role="alert""#));
    }
}
