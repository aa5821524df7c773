//! News article repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use domain::models::{NewsArticle, NewsInput};
use domain::repositories::{NewsRepository, RepoResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::entities::{NewsArticleEntity, NewsStatusDb};
use crate::metrics::QueryTimer;

/// Repository for news articles.
#[derive(Clone)]
pub struct PgNewsRepository {
    pool: PgPool,
}

impl PgNewsRepository {
    /// Creates a new PgNewsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsRepository for PgNewsRepository {
    async fn list(&self) -> RepoResult<Vec<NewsArticle>> {
        let timer = QueryTimer::new("list_news_articles");
        let result = sqlx::query_as::<_, NewsArticleEntity>(
            r#"
            SELECT id, title, excerpt, content, author, category, status, is_featured,
                   image_url, published_at, view_count
            FROM news_articles
            ORDER BY published_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<NewsArticle>> {
        let timer = QueryTimer::new("find_news_article_by_id");
        let result = sqlx::query_as::<_, NewsArticleEntity>(
            r#"
            SELECT id, title, excerpt, content, author, category, status, is_featured,
                   image_url, published_at, view_count
            FROM news_articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn create(&self, input: NewsInput, author: &str) -> RepoResult<NewsArticle> {
        let timer = QueryTimer::new("create_news_article");
        let result = sqlx::query_as::<_, NewsArticleEntity>(
            r#"
            INSERT INTO news_articles (id, title, excerpt, content, author, category, status,
                                       is_featured, image_url, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, title, excerpt, content, author, category, status, is_featured,
                      image_url, published_at, view_count
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.excerpt)
        .bind(&input.content)
        .bind(author)
        .bind(&input.category)
        .bind(NewsStatusDb::from(input.status))
        .bind(input.is_featured)
        .bind(&input.image_url)
        .bind(input.published_at.unwrap_or_else(Utc::now))
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.into())
    }

    async fn update(&self, id: Uuid, input: NewsInput) -> RepoResult<Option<NewsArticle>> {
        let timer = QueryTimer::new("update_news_article");
        let result = sqlx::query_as::<_, NewsArticleEntity>(
            r#"
            UPDATE news_articles
            SET title = $2, excerpt = $3, content = $4, category = $5, status = $6,
                is_featured = $7, image_url = $8,
                published_at = COALESCE($9, published_at)
            WHERE id = $1
            RETURNING id, title, excerpt, content, author, category, status, is_featured,
                      image_url, published_at, view_count
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.excerpt)
        .bind(&input.content)
        .bind(&input.category)
        .bind(NewsStatusDb::from(input.status))
        .bind(input.is_featured)
        .bind(&input.image_url)
        .bind(input.published_at)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let timer = QueryTimer::new("delete_news_article");
        let result = sqlx::query("DELETE FROM news_articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.rows_affected() > 0)
    }

    async fn increment_views(&self, id: Uuid) -> RepoResult<Option<NewsArticle>> {
        let timer = QueryTimer::new("increment_news_views");
        let result = sqlx::query_as::<_, NewsArticleEntity>(
            r#"
            UPDATE news_articles
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING id, title, excerpt, content, author, category, status, is_featured,
                      image_url, published_at, view_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }
}
