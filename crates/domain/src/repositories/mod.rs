//! Storage ports used by the domain services.
//!
//! PostgreSQL implementations live in the `persistence` crate; [`memory::InMemoryStore`]
//! implements every trait for tests and local runs.

pub mod memory;

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::models::{
    ApprovalStatus, DecisionOutcome, DecisionRecord, Document, DocumentInput, Identity,
    NewIdentity, NewRegistrationRequest, NewsArticle, NewsInput, ProfileUpdate,
    RegistrationRequest, Role, SessionIdentity, StoredCredentials,
};

pub use memory::InMemoryStore;

pub type RepoResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Identity>>;

    /// Exact, case-sensitive email lookup.
    async fn find_credentials(&self, email: &str) -> RepoResult<Option<StoredCredentials>>;

    /// Fails with [`RepositoryError::Conflict`] when the email is taken.
    async fn create(&self, identity: NewIdentity) -> RepoResult<Identity>;

    /// All identities, oldest first.
    async fn list(&self) -> RepoResult<Vec<Identity>>;

    /// Sets the approval status and, when `role` is given, the role.
    async fn update_approval(
        &self,
        id: Uuid,
        role: Option<Role>,
        status: ApprovalStatus,
    ) -> RepoResult<Option<Identity>>;

    async fn update_profile(&self, id: Uuid, profile: ProfileUpdate)
        -> RepoResult<Option<Identity>>;

    async fn set_active(&self, id: Uuid, active: bool) -> RepoResult<Option<Identity>>;
}

#[async_trait]
pub trait RegistrationRequestRepository: Send + Sync {
    /// Creates the identity and its request in one unit of work.
    async fn create_with_identity(
        &self,
        identity: NewIdentity,
        request: NewRegistrationRequest,
    ) -> RepoResult<(Identity, RegistrationRequest)>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RegistrationRequest>>;

    /// All requests in insertion order.
    async fn list(&self) -> RepoResult<Vec<RegistrationRequest>>;

    /// Writes `decision` only if the request is still pending. Check and write are atomic.
    async fn apply_decision(&self, id: Uuid, decision: DecisionRecord)
        -> RepoResult<DecisionOutcome>;
}

/// Server-side session slots keyed by session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Last write wins.
    async fn save(&self, session_id: Uuid, identity: &SessionIdentity) -> RepoResult<()>;

    /// A slot saved more than `max_age` ago counts as absent.
    async fn load(
        &self,
        session_id: Uuid,
        max_age: Duration,
    ) -> RepoResult<Option<SessionIdentity>>;

    /// Removing a missing slot is not an error.
    async fn clear(&self, session_id: Uuid) -> RepoResult<()>;

    /// Drops every slot held by `identity_id`. Returns how many were removed.
    async fn clear_identity(&self, identity_id: Uuid) -> RepoResult<u64>;

    /// Drops every slot older than `max_age`. Returns how many were removed.
    async fn prune_expired(&self, max_age: Duration) -> RepoResult<u64>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<Document>>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Document>>;

    async fn create(&self, input: DocumentInput, uploaded_by: &str) -> RepoResult<Document>;

    async fn update(&self, id: Uuid, input: DocumentInput) -> RepoResult<Option<Document>>;

    async fn delete(&self, id: Uuid) -> RepoResult<bool>;

    async fn increment_downloads(&self, id: Uuid) -> RepoResult<Option<Document>>;
}

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<NewsArticle>>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<NewsArticle>>;

    async fn create(&self, input: NewsInput, author: &str) -> RepoResult<NewsArticle>;

    async fn update(&self, id: Uuid, input: NewsInput) -> RepoResult<Option<NewsArticle>>;

    async fn delete(&self, id: Uuid) -> RepoResult<bool>;

    async fn increment_views(&self, id: Uuid) -> RepoResult<Option<NewsArticle>>;
}

/// Liveness check for the backing store.
#[async_trait]
pub trait StorageHealth: Send + Sync {
    async fn ping(&self) -> bool;
}
