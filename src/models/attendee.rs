use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

use super::BookingRecord;

pub const MAX_ABOUT_CHARS: usize = 300;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Fields owned by the attendee screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttendeeField {
    FullName,
    Email,
    About,
    AvatarUrl,
}

impl AttendeeField {
    #[cfg(test)]
    pub const ALL: [AttendeeField; 4] = [
        AttendeeField::FullName,
        AttendeeField::Email,
        AttendeeField::About,
        AttendeeField::AvatarUrl,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AttendeeField::FullName => "fullName",
            AttendeeField::Email => "email",
            AttendeeField::About => "about",
            AttendeeField::AvatarUrl => "avatarUrl",
        }
    }

    // Accepts both the Rust field name (validator's key) and the form name
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "full_name" | "fullName" => Some(AttendeeField::FullName),
            "email" => Some(AttendeeField::Email),
            "about" => Some(AttendeeField::About),
            "avatar_url" | "avatarUrl" => Some(AttendeeField::AvatarUrl),
            _ => None,
        }
    }
}

// One message per failing field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<AttendeeField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` unless the field already has an error.
    pub fn insert(&mut self, field: AttendeeField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: AttendeeField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = AttendeeField> + '_ {
        self.0.keys().copied()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (key, field_errors) in errors.field_errors() {
            let Some(field) = AttendeeField::from_key(&key) else {
                continue;
            };
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| first.code.to_string());
                out.insert(field, message);
            }
        }
        out
    }
}

/// Attendee screen input, validated as a whole before the wizard advances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct AttendeeForm {
    #[validate(custom(function = "check_full_name"))]
    pub full_name: String,
    #[validate(custom(function = "check_email"))]
    pub email: String,
    #[validate(custom(function = "check_about"))]
    pub about: String,
    #[validate(required(message = "Profile photo is required"))]
    pub avatar_url: Option<String>,
}

impl AttendeeForm {
    pub fn from_record(record: &BookingRecord) -> Self {
        AttendeeForm {
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            about: record.about.clone(),
            avatar_url: record.avatar_url.clone().filter(|url| !url.trim().is_empty()),
        }
    }

    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|errors| FieldErrors::from(&errors))
    }

    /// Copies the attendee fields into `record`, leaving the ticket selection alone.
    pub fn merge_into(self, record: &mut BookingRecord) {
        record.full_name = self.full_name;
        record.email = self.email;
        record.about = self.about;
        record.avatar_url = self.avatar_url;
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn check_full_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", "Full name is required"));
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", "Email is required"));
    }
    if !EMAIL_PATTERN.is_match(value) {
        return Err(field_error("email", "Enter a valid email address"));
    }
    Ok(())
}

fn check_about(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error(
            "required",
            "Please provide some details about the project",
        ));
    }
    if value.chars().count() > MAX_ABOUT_CHARS {
        return Err(field_error(
            "length",
            "About section must be less than 300 characters",
        ));
    }
    Ok(())
}
