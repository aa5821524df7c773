//! Common validation rules for request payloads.
//!
//! Every function here plugs into `#[validate(custom(function = "..."))]`.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Digits with optional leading `+`, spaces, dashes, dots and parentheses.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9(][0-9 ().-]{5,24}$").unwrap();
    /// Union member numbers: letters/digits with optional dashes, e.g. `TU001`.
    static ref MEMBER_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{1,31}$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}

/// Roles a registrant may ask for.
pub fn validate_requested_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "editor" | "member" => Ok(()),
        _ => Err(error(
            "invalid_requested_role",
            "Requested role must be 'editor' or 'member'",
        )),
    }
}

/// Phone numbers as typed by people, not strict E.164.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    if trimmed.is_empty() || PHONE_RE.is_match(trimmed) {
        Ok(())
    } else {
        Err(error("invalid_phone", "Invalid phone number"))
    }
}

/// Member identifiers issued by the union.
pub fn validate_member_id(member_id: &str) -> Result<(), ValidationError> {
    let trimmed = member_id.trim();
    if trimmed.is_empty() || MEMBER_ID_RE.is_match(trimmed) {
        Ok(())
    } else {
        Err(error("invalid_member_id", "Invalid member identifier"))
    }
}

/// Normalizes an optional free-text field: blank becomes `None`, the rest is trimmed.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
