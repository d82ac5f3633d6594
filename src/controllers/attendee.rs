use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    avatars::AvatarError,
    middleware::NavState,
    models::{AttendeeField, AttendeeForm, BookingRecord, FieldErrors, TicketType},
    views::attendee::{self, AttendeeView},
    AppState,
};

const INVALID_ALERT: &str = "Please fill in all the required fields.";
const SAVE_FAILED_ALERT: &str = "An error occurred while saving the form. Please try again.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/attendee", get(show_form).post(submit_form))
        .route("/avatars", post(upload_avatar))
}

/* ---------- helpers ---------- */

struct Upload {
    content_type: Option<String>,
    bytes: Bytes,
}

// Everything the attendee form posts, before validation
#[derive(Default)]
struct Submission {
    record: BookingRecord,
    upload: Option<Upload>,
}

async fn read_submission(mut multipart: Multipart) -> Result<Submission, MultipartError> {
    let mut submission = Submission::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "avatar" {
            let has_name = field.file_name().is_some_and(|f| !f.is_empty());
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            // an untouched file input posts an empty, unnamed part
            if has_name || !bytes.is_empty() {
                submission.upload = Some(Upload { content_type, bytes });
            }
            continue;
        }

        let value = field.text().await?;
        let record = &mut submission.record;
        match name.as_str() {
            "ticketType" => {
                record.ticket_type = TicketType::ALL.into_iter().find(|t| t.label() == value);
            }
            "numTickets" => record.num_tickets = value.trim().parse().ok(),
            "fullName" => record.full_name = value,
            "email" => record.email = value,
            "about" => record.about = value,
            "avatarUrl" => record.avatar_url = Some(value).filter(|v| !v.trim().is_empty()),
            other => warn!("Ignoring unexpected form field {other:?}"),
        }
    }
    submission.record.drop_invalid_quantity();
    Ok(submission)
}

// A reference that no longer dereferences counts as no photo
async fn forget_missing_avatar(state: &AppState, record: &mut BookingRecord) {
    let Some(reference) = record.avatar_url.as_deref() else {
        return;
    };
    if state.avatars.resolve(reference).await.is_none() {
        warn!("Dropping unknown avatar reference {reference:?}");
        record.avatar_url = None;
    }
}

fn form_page(status: StatusCode, record: &BookingRecord, errors: &FieldErrors, alert: Option<&str>) -> Response {
    (status, attendee::render(&AttendeeView { record, errors, alert })).into_response()
}

/* ---------- ATTENDEE FORM ---------- */

// GET /attendee
async fn show_form(State(state): State<Arc<AppState>>, NavState(nav): NavState) -> Response {
    let mut record = state.drafts.load_draft().await.unwrap_or_default();
    forget_missing_avatar(&state, &mut record).await;
    if let Some(selection) = nav.as_ref().and_then(BookingRecord::selection) {
        record.apply_selection(selection);
    }
    form_page(StatusCode::OK, &record, &FieldErrors::new(), None)
}

// POST /attendee
async fn submit_form(State(state): State<Arc<AppState>>, multipart: Multipart) -> Result<Response, MultipartError> {
    let Submission { mut record, upload } = read_submission(multipart).await?;

    let mut errors = FieldErrors::new();
    if let Some(upload) = upload {
        match state.avatars.intake(upload.content_type.as_deref(), upload.bytes).await {
            Ok(reference) => record.avatar_url = Some(reference),
            Err(e) => {
                warn!("Image upload failed: {e:?}");
                errors.insert(AttendeeField::AvatarUrl, e.to_string());
            }
        }
    }
    forget_missing_avatar(&state, &mut record).await;

    let form = AttendeeForm::from_record(&record);
    if let Err(field_errors) = form.check() {
        errors.merge(field_errors);
    }
    if !errors.is_empty() {
        info!("Attendee form rejected: {} field(s) invalid", errors.len());
        return Ok(form_page(StatusCode::UNPROCESSABLE_ENTITY, &record, &errors, Some(INVALID_ALERT)));
    }

    form.merge_into(&mut record);
    if state.drafts.save(&record).await.is_err() {
        return Ok(form_page(
            StatusCode::INTERNAL_SERVER_ERROR,
            &record,
            &errors,
            Some(SAVE_FAILED_ALERT),
        ));
    }

    info!("Attendee details saved for {}", record.email);
    Ok(attendee::confirmation(&record).into_response())
}

/* ---------- AVATARS ---------- */

// POST /avatars
async fn upload_avatar(State(state): State<Arc<AppState>>, multipart: Multipart) -> Result<Response, MultipartError> {
    let Submission { upload, .. } = read_submission(multipart).await?;
    let result = match upload {
        Some(upload) => state.avatars.intake(upload.content_type.as_deref(), upload.bytes).await,
        None => Err(AvatarError::Empty),
    };

    Ok(match result {
        Ok(reference) => (StatusCode::CREATED, Json(json!({ "avatarUrl": reference }))).into_response(),
        Err(e) => {
            warn!("Image upload failed: {e:?}");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    })
}
