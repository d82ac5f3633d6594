use axum::response::Html;
use std::fmt::Write as _;

use super::{alert, escape, page, progress};
use crate::models::{AttendeeField, BookingRecord, FieldErrors};
use crate::services::navigation;

// Drag-and-drop goes through POST /avatars; the picker posts with the form
const DROP_SCRIPT: &str = r#"<script>
(function () {
  var zone = document.getElementById('drop');
  var ref = document.getElementById('avatarUrl');
  var err = document.getElementById('avatarError');
  zone.addEventListener('dragover', function (e) { e.preventDefault(); zone.classList.add('dragging'); });
  zone.addEventListener('dragleave', function () { zone.classList.remove('dragging'); });
  zone.addEventListener('drop', function (e) {
    e.preventDefault();
    zone.classList.remove('dragging');
    var file = e.dataTransfer.files[0];
    if (!file) return;
    var body = new FormData();
    body.append('avatar', file);
    fetch('/avatars', { method: 'POST', body: body })
      .then(function (r) { return r.json(); })
      .then(function (data) {
        if (data.avatarUrl) {
          ref.value = data.avatarUrl;
          document.getElementById('preview').src = data.avatarUrl;
          document.getElementById('preview').hidden = false;
          err.textContent = '';
        } else {
          err.textContent = data.error;
        }
      });
  });
})();
</script>"#;

pub struct AttendeeView<'a> {
    pub record: &'a BookingRecord,
    pub errors: &'a FieldErrors,
    pub alert: Option<&'a str>,
}

fn field_error(errors: &FieldErrors, field: AttendeeField) -> String {
    match errors.get(field) {
        Some(message) => format!(
            r#"<p class="error" id="{}Error">{}</p>"#,
            field.key(),
            escape(message)
        ),
        None => format!(r#"<p class="error" id="{}Error"></p>"#, field.key()),
    }
}

pub fn render(view: &AttendeeView<'_>) -> Html<String> {
    let record = view.record;
    let mut body = progress(2, "Attendee Details");
    body.push_str(&alert(view.alert));
    body.push_str(r#"<form method="post" action="/attendee" enctype="multipart/form-data">"#);

    if let Some(ticket_type) = record.ticket_type {
        let _ = write!(body, r#"<input type="hidden" name="ticketType" value="{}">"#, escape(ticket_type.label()));
    }
    if let Some(n) = record.num_tickets {
        let _ = write!(body, r#"<input type="hidden" name="numTickets" value="{n}">"#);
    }

    let avatar = record.avatar_url.as_deref().unwrap_or_default();
    let _ = write!(
        body,
        r#"<h2>Upload Profile Photo</h2><div class="drop" id="drop"><img id="preview" alt="Uploaded" src="{src}"{hidden}><label for="avatarUpload">Drag &amp; drop or click to upload</label><input type="file" accept="image/*" id="avatarUpload" name="avatar"><input type="hidden" id="avatarUrl" name="avatarUrl" value="{src}">{error}</div>"#,
        src = escape(avatar),
        hidden = if avatar.is_empty() { " hidden" } else { "" },
        error = field_error(view.errors, AttendeeField::AvatarUrl),
    );

    let _ = write!(
        body,
        r#"<label for="fullName">Enter your name</label><input type="text" id="fullName" name="fullName" value="{}">{}"#,
        escape(&record.full_name),
        field_error(view.errors, AttendeeField::FullName),
    );
    let _ = write!(
        body,
        r#"<label for="email">Enter your email</label><input type="email" id="email" name="email" value="{}">{}"#,
        escape(&record.email),
        field_error(view.errors, AttendeeField::Email),
    );
    let _ = write!(
        body,
        r#"<label for="about">About the Project</label><textarea id="about" name="about" rows="4">{}</textarea>{}"#,
        escape(&record.about),
        field_error(view.errors, AttendeeField::About),
    );

    let back = match record.selection() {
        Some(selection) => navigation::location("/", &selection),
        None => "/".to_string(),
    };
    let _ = write!(
        body,
        r#"<div class="actions"><a class="button secondary" href="{}">Back</a><button type="submit">Get my free ticket</button></div></form>"#,
        escape(&back)
    );
    body.push_str(DROP_SCRIPT);

    page("Attendee Details", &body)
}

/// Shown once the draft is saved; continuing opens the ticket with `record` as navigation state.
pub fn confirmation(record: &BookingRecord) -> Html<String> {
    let next = navigation::location("/ticket", record);
    let body = format!(
        r#"<div class="notice" role="alert">Form submitted and saved successfully!</div><div class="actions"><a class="button" id="continue" href="{}">OK</a></div>"#,
        escape(&next)
    );
    page("Saved", &body)
}
