//! Session authentication middleware.
//!
//! A request is authenticated when it carries a valid Bearer token *and* the
//! session the token names is still open in the session store.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::errors::DomainError;
use domain::models::SessionIdentity;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// The authenticated session, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session_id: Uuid,
    pub identity: SessionIdentity,
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves a token to its open session.
async fn resolve_session(state: &AppState, token: &str) -> Result<CurrentSession, ApiError> {
    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Token validation failed");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;
    let session_id = claims
        .session_id()
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let identity = state
        .identity
        .current(session_id)
        .await
        .map_err(|e| match e {
            DomainError::Unauthenticated => {
                ApiError::Unauthorized("Session has ended".to_string())
            }
            other => other.into(),
        })?;

    Ok(CurrentSession {
        session_id,
        identity,
    })
}

/// Middleware that requires an open session.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
            .into_response();
    };

    match resolve_session(&state, token).await {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Middleware that attaches the session when one is presented, and otherwise
/// lets the request through anonymously.
pub async fn optional_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&req) {
        match resolve_session(&state, token).await {
            Ok(session) => {
                req.extensions_mut().insert(session);
            }
            Err(ApiError::Unauthorized(_)) => {}
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}
