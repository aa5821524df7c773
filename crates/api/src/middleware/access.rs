//! Role guards for protected surfaces.
//!
//! Must run after [`require_session`](super::session_auth::require_session).
//! Denied requests never reach the handler.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::services::{authorize, ProtectedSurface};

use super::session_auth::CurrentSession;
use crate::error::ApiError;

pub async fn require_profile(req: Request<Body>, next: Next) -> Response {
    require_surface_impl(req, next, ProtectedSurface::Profile).await
}

pub async fn require_member_directory(req: Request<Body>, next: Next) -> Response {
    require_surface_impl(req, next, ProtectedSurface::MemberDirectory).await
}

pub async fn require_admin_dashboard(req: Request<Body>, next: Next) -> Response {
    require_surface_impl(req, next, ProtectedSurface::AdminDashboard).await
}

pub async fn require_registration_approval(req: Request<Body>, next: Next) -> Response {
    require_surface_impl(req, next, ProtectedSurface::RegistrationApproval).await
}

pub async fn require_user_management(req: Request<Body>, next: Next) -> Response {
    require_surface_impl(req, next, ProtectedSurface::UserManagement).await
}

pub async fn require_document_management(req: Request<Body>, next: Next) -> Response {
    require_surface_impl(req, next, ProtectedSurface::DocumentManagement).await
}

pub async fn require_news_management(req: Request<Body>, next: Next) -> Response {
    require_surface_impl(req, next, ProtectedSurface::NewsManagement).await
}

async fn require_surface_impl(
    req: Request<Body>,
    next: Next,
    surface: ProtectedSurface,
) -> Response {
    let identity = req
        .extensions()
        .get::<CurrentSession>()
        .map(|session| &session.identity);

    if let Err(e) = authorize(identity, surface) {
        tracing::info!(
            surface = ?surface,
            identity_id = ?identity.map(|i| i.id),
            "Access denied"
        );
        return ApiError::from(e).into_response();
    }

    next.run(req).await
}
