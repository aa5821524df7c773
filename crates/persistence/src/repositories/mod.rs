//! PostgreSQL implementations of the domain repository traits.

pub mod document;
pub mod identity;
pub mod news;
pub mod registration_request;
pub mod session;

pub use document::PgDocumentRepository;
pub use identity::PgIdentityRepository;
pub use news::PgNewsRepository;
pub use registration_request::PgRegistrationRequestRepository;
pub use session::PgSessionStore;

use domain::errors::RepositoryError;

/// Maps sqlx errors onto the domain's repository errors.
///
/// Unique violations (e.g. a taken email) become [`RepositoryError::Conflict`].
pub(crate) fn map_sqlx_error(error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(db.message().to_string())
        }
        _ => RepositoryError::Storage(error.to_string()),
    }
}
