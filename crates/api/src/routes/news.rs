//! News routes: published articles and editorial management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{ManageNewsQuery, NewsArticle, NewsInput, NewsQuery, NewsStats};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageNewsResponse {
    pub articles: Vec<NewsArticle>,
    pub stats: NewsStats,
}

/// GET /api/v1/news?search=&category=
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<NewsArticle>>, ApiError> {
    Ok(Json(state.content.list_news(&query).await?))
}

/// GET /api/v1/news/:id
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NewsArticle>, ApiError> {
    Ok(Json(state.content.get_article(id).await?))
}

/// GET /api/v1/admin/news?search=&category=&status=
pub async fn manage_news(
    State(state): State<AppState>,
    Query(query): Query<ManageNewsQuery>,
) -> Result<Json<ManageNewsResponse>, ApiError> {
    let articles = state.content.manage_news(&query).await?;
    let stats = state.content.news_stats().await?;
    Ok(Json(ManageNewsResponse { articles, stats }))
}

/// POST /api/v1/admin/news
pub async fn create_article(
    State(state): State<AppState>,
    Session(session): Session,
    Json(input): Json<NewsInput>,
) -> Result<(StatusCode, Json<NewsArticle>), ApiError> {
    let article = state.content.create_article(input, &session.identity).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /api/v1/admin/news/:id
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewsInput>,
) -> Result<Json<NewsArticle>, ApiError> {
    Ok(Json(state.content.update_article(id, input).await?))
}

/// DELETE /api/v1/admin/news/:id
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.content.delete_article(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
