//! Field checks shared by the request payloads.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{FieldErrors, MSG_BLANK, MSG_INVALID_EMAIL, MSG_NULL_CHAR, MSG_REQUIRED, MSG_TOO_LONG};

/// Column width of every text column in the schema.
pub(crate) const MAX_TEXT_LEN: usize = 255;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Validates a text field.
///
/// A missing value is an error unless `partial` is set (PATCH). Present
/// values must not be blank, contain NUL or exceed [`MAX_TEXT_LEN`]
/// characters; they are trimmed first when `trim` is set.
pub(crate) fn text_field(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    partial: bool,
    trim: bool,
) -> Option<String> {
    let Some(raw) = value else {
        if !partial {
            errors.add(field, MSG_REQUIRED);
        }
        return None;
    };
    let value = if trim { raw.trim().to_string() } else { raw };
    if value.is_empty() {
        errors.add(field, MSG_BLANK);
        return None;
    }
    if value.contains('\0') {
        errors.add(field, MSG_NULL_CHAR);
        return None;
    }
    if value.chars().count() > MAX_TEXT_LEN {
        errors.add(field, MSG_TOO_LONG);
        return None;
    }
    Some(value)
}

/// Like [`text_field`], then lower-cases and checks the address shape.
pub(crate) fn email_field(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    partial: bool,
) -> Option<String> {
    let email = text_field(errors, field, value, partial, true)?.to_lowercase();
    if !is_valid_email(&email) {
        errors.add(field, MSG_INVALID_EMAIL);
        return None;
    }
    Some(email)
}
