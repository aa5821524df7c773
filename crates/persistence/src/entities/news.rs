//! News article entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{NewsArticle, NewsStatus};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "news_status", rename_all = "lowercase")]
pub enum NewsStatusDb {
    Draft,
    Published,
    Archived,
}

impl From<NewsStatus> for NewsStatusDb {
    fn from(status: NewsStatus) -> Self {
        match status {
            NewsStatus::Draft => NewsStatusDb::Draft,
            NewsStatus::Published => NewsStatusDb::Published,
            NewsStatus::Archived => NewsStatusDb::Archived,
        }
    }
}

impl From<NewsStatusDb> for NewsStatus {
    fn from(status: NewsStatusDb) -> Self {
        match status {
            NewsStatusDb::Draft => NewsStatus::Draft,
            NewsStatusDb::Published => NewsStatus::Published,
            NewsStatusDb::Archived => NewsStatus::Archived,
        }
    }
}

/// Database row mapping for the news_articles table.
#[derive(Debug, Clone, FromRow)]
pub struct NewsArticleEntity {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub status: NewsStatusDb,
    pub is_featured: bool,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub view_count: i64,
}

impl From<NewsArticleEntity> for NewsArticle {
    fn from(entity: NewsArticleEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            excerpt: entity.excerpt,
            content: entity.content,
            author: entity.author,
            category: entity.category,
            status: entity.status.into(),
            is_featured: entity.is_featured,
            image_url: entity.image_url,
            published_at: entity.published_at,
            view_count: entity.view_count,
        }
    }
}
