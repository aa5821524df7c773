//! Domain error taxonomy.

use shared::password::PasswordError;
use thiserror::Error;

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated (e.g. duplicate email).
    #[error("Duplicate value: {0}")]
    Conflict(String),

    /// The backing store failed or returned data it could not decode.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors surfaced by domain services.
///
/// Each variant is meant to be turned into a visible message at the point of the
/// user-triggered action; none of them should escape as an unhandled fault.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Client-supplied data failed a rule checked by the service itself.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Client-supplied data failed schema validation.
    #[error("Validation error: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    /// Credentials did not match. Deliberately does not say which part was wrong.
    #[error("Invalid credentials")]
    Authentication,

    /// No current identity for a surface that requires one.
    #[error("Authentication required")]
    Unauthenticated,

    /// The current identity's role is not in the surface's required-roles set.
    #[error("Access denied")]
    AccessDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation attempted on a record outside its precondition state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_error_does_not_leak_detail() {
        assert_eq!(DomainError::Authentication.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_repository_error_is_transparent() {
        let err: DomainError = RepositoryError::Storage("connection reset".to_string()).into();
        assert_eq!(err.to_string(), "Storage error: connection reset");
    }

    #[test]
    fn test_invalid_state_display() {
        let err = DomainError::InvalidState("Request already approved".to_string());
        assert_eq!(err.to_string(), "Invalid state: Request already approved");
    }
}
