//! Public contact form.

use axum::{http::StatusCode, Json};
use domain::models::{ContactMessage, ContactReceipt};
use tracing::info;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::metrics::record_contact_message;

/// Accept a contact form submission. The message is logged, not stored.
///
/// POST /api/v1/contact
pub async fn submit_contact(
    Json(message): Json<ContactMessage>,
) -> Result<(StatusCode, Json<ContactReceipt>), ApiError> {
    message.validate()?;

    let receipt = ContactReceipt::received();
    info!(
        reference = %receipt.reference,
        from = %message.email,
        subject = %message.subject.trim(),
        length = message.message.chars().count(),
        "Contact message received"
    );
    record_contact_message();

    Ok((StatusCode::ACCEPTED, Json(receipt)))
}
