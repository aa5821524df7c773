//! Session extractors for handlers behind the session middleware.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::session_auth::CurrentSession;

/// The session attached by `require_session`. Rejects with 401 when absent.
#[derive(Debug, Clone)]
pub struct Session(pub CurrentSession);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .map(Session)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// The session attached by `optional_session`, if any.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<CurrentSession>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(
            parts.extensions.get::<CurrentSession>().cloned(),
        ))
    }
}
