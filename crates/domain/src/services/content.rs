//! Document library and news.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{DomainError, DomainResult};
use crate::models::{
    Document, DocumentInput, DocumentQuery, DocumentStats, ManageNewsQuery, NewsArticle,
    NewsInput, NewsQuery, NewsStats, NewsStatus, SessionIdentity,
};
use crate::repositories::{DocumentRepository, NewsRepository};

fn document_not_found() -> DomainError {
    DomainError::NotFound("Document not found".to_string())
}

fn article_not_found() -> DomainError {
    DomainError::NotFound("Article not found".to_string())
}

#[derive(Clone)]
pub struct ContentService {
    documents: Arc<dyn DocumentRepository>,
    news: Arc<dyn NewsRepository>,
}

impl ContentService {
    pub fn new(documents: Arc<dyn DocumentRepository>, news: Arc<dyn NewsRepository>) -> Self {
        Self { documents, news }
    }

    /// Documents visible to `viewer`. Anonymous viewers only see public documents.
    pub async fn list_documents(
        &self,
        viewer: Option<&SessionIdentity>,
        query: &DocumentQuery,
    ) -> DomainResult<Vec<Document>> {
        let documents = self.documents.list().await?;
        Ok(query.apply(documents, viewer.is_some()))
    }

    /// A private document requested anonymously is reported as missing.
    pub async fn get_document(
        &self,
        viewer: Option<&SessionIdentity>,
        id: Uuid,
    ) -> DomainResult<Document> {
        let document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or_else(document_not_found)?;

        if !document.is_public && viewer.is_none() {
            return Err(document_not_found());
        }
        Ok(document)
    }

    /// Records a download and returns the updated record.
    pub async fn download_document(
        &self,
        viewer: Option<&SessionIdentity>,
        id: Uuid,
    ) -> DomainResult<Document> {
        self.get_document(viewer, id).await?;
        self.documents
            .increment_downloads(id)
            .await?
            .ok_or_else(document_not_found)
    }

    /// Management listing: every document, filtered and sorted by `query`.
    pub async fn manage_documents(&self, query: &DocumentQuery) -> DomainResult<Vec<Document>> {
        let documents = self.documents.list().await?;
        Ok(query.apply(documents, true))
    }

    pub async fn create_document(
        &self,
        input: DocumentInput,
        author: &SessionIdentity,
    ) -> DomainResult<Document> {
        input.validate()?;
        let uploaded_by = format!("{} {}", author.first_name, author.last_name);
        let document = self.documents.create(input, &uploaded_by).await?;
        info!(document_id = %document.id, created_by = %author.id, "Document created");
        Ok(document)
    }

    pub async fn update_document(&self, id: Uuid, input: DocumentInput) -> DomainResult<Document> {
        input.validate()?;
        self.documents
            .update(id, input)
            .await?
            .ok_or_else(document_not_found)
    }

    pub async fn delete_document(&self, id: Uuid) -> DomainResult<()> {
        if !self.documents.delete(id).await? {
            return Err(document_not_found());
        }
        info!(document_id = %id, "Document deleted");
        Ok(())
    }

    pub async fn document_stats(&self) -> DomainResult<DocumentStats> {
        let documents = self.documents.list().await?;
        Ok(DocumentStats::from_documents(&documents))
    }

    /// Published articles, featured first.
    pub async fn list_news(&self, query: &NewsQuery) -> DomainResult<Vec<NewsArticle>> {
        let articles = self.news.list().await?;
        Ok(query.apply(articles))
    }

    /// A published article. Counts the view.
    pub async fn get_article(&self, id: Uuid) -> DomainResult<NewsArticle> {
        let article = self
            .news
            .find_by_id(id)
            .await?
            .ok_or_else(article_not_found)?;

        if article.status != NewsStatus::Published {
            return Err(article_not_found());
        }

        self.news
            .increment_views(id)
            .await?
            .ok_or_else(article_not_found)
    }

    pub async fn manage_news(&self, query: &ManageNewsQuery) -> DomainResult<Vec<NewsArticle>> {
        let articles = self.news.list().await?;
        query
            .apply(articles)
            .map_err(|e| DomainError::Validation(e.to_string()))
    }

    pub async fn create_article(
        &self,
        input: NewsInput,
        author: &SessionIdentity,
    ) -> DomainResult<NewsArticle> {
        input.validate()?;
        let author_name = format!("{} {}", author.first_name, author.last_name);
        let article = self.news.create(input, &author_name).await?;
        info!(article_id = %article.id, created_by = %author.id, "Article created");
        Ok(article)
    }

    pub async fn update_article(&self, id: Uuid, input: NewsInput) -> DomainResult<NewsArticle> {
        input.validate()?;
        self.news
            .update(id, input)
            .await?
            .ok_or_else(article_not_found)
    }

    pub async fn delete_article(&self, id: Uuid) -> DomainResult<()> {
        if !self.news.delete(id).await? {
            return Err(article_not_found());
        }
        info!(article_id = %id, "Article deleted");
        Ok(())
    }

    pub async fn news_stats(&self) -> DomainResult<NewsStats> {
        let articles = self.news.list().await?;
        Ok(NewsStats::from_articles(&articles))
    }
}
