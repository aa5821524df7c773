//! Admin dashboard aggregates.

use axum::{extract::State, Json};
use domain::models::DashboardSummary;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/admin/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let (registrations, users, documents, news) = tokio::try_join!(
        state.approvals.stats(),
        state.directory.user_stats(),
        state.content.document_stats(),
        state.content.news_stats(),
    )?;

    Ok(Json(DashboardSummary {
        registrations,
        users,
        documents,
        news,
    }))
}
