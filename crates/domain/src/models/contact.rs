//! Public contact form submissions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A message sent through the public contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 1, max = 200, message = "Subject must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub subject: String,

    #[validate(length(
        min = 10,
        max = 5000,
        message = "Message must be between 10 and 5000 characters"
    ))]
    pub message: String,
}

/// Acknowledgement returned for an accepted submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub reference: Uuid,
    pub status: &'static str,
}

impl ContactReceipt {
    pub fn received() -> Self {
        Self {
            reference: Uuid::new_v4(),
            status: "received",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(body: &str) -> ContactMessage {
        serde_json::from_value(json!({
            "name": "Karim Bennani",
            "email": "karim@example.org",
            "subject": "Membership fees",
            "message": body
        }))
        .unwrap()
    }

    #[test]
    fn test_contact_message_valid() {
        assert!(message("When are the 2025 fees due?").validate().is_ok());
    }

    #[test]
    fn test_contact_message_too_short() {
        let errors = message("Hi there").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("message"));
    }

    #[test]
    fn test_contact_message_requires_subject_and_email() {
        let payload: ContactMessage = serde_json::from_value(json!({
            "name": "Karim Bennani",
            "email": "not-an-email",
            "subject": "  ",
            "message": "A long enough message"
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("subject"));
    }
}
