//! In-memory implementation of every repository port.
//!
//! All collections sit behind one `RwLock`, so multi-collection writes
//! (identity plus request, decision check-and-set) are atomic.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    DocumentRepository, IdentityRepository, NewsRepository, RegistrationRequestRepository,
    RepoResult, SessionStore, StorageHealth,
};
use crate::errors::RepositoryError;
use crate::models::{
    ApprovalStatus, DecisionOutcome, DecisionRecord, Document, DocumentInput, Identity,
    NewIdentity, NewRegistrationRequest, NewsArticle, NewsInput, ProfileUpdate,
    RegistrationRequest, Role, SessionIdentity, StoredCredentials,
};

struct SessionSlot {
    identity: SessionIdentity,
    created_at: DateTime<Utc>,
}

impl SessionSlot {
    fn is_live(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.created_at <= max_age
    }
}

#[derive(Default)]
struct State {
    identities: Vec<StoredCredentials>,
    requests: Vec<RegistrationRequest>,
    sessions: HashMap<Uuid, SessionSlot>,
    documents: Vec<Document>,
    news: Vec<NewsArticle>,
}

impl State {
    fn identity_mut(&mut self, id: Uuid) -> Option<&mut StoredCredentials> {
        self.identities
            .iter_mut()
            .find(|stored| stored.identity.id == id)
    }

    fn insert_identity(&mut self, new: NewIdentity) -> RepoResult<Identity> {
        if self
            .identities
            .iter()
            .any(|stored| stored.identity.email == new.email)
        {
            return Err(RepositoryError::Conflict(format!(
                "Email already registered: {}",
                new.email
            )));
        }

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::new_v4(),
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            phone: new.phone,
            member_id: new.member_id,
            approval_status: new.approval_status,
            requested_role: new.requested_role,
            university: new.university,
            department: new.department,
            position: new.position,
            specialization: new.specialization,
            directory_visible: new.directory_visible,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.identities.push(StoredCredentials {
            identity: identity.clone(),
            password_hash: new.password_hash,
        });
        Ok(identity)
    }
}

/// Process-local store. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed document, e.g. fixture data.
    pub async fn insert_document(&self, document: Document) {
        self.state.write().await.documents.push(document);
    }

    /// Inserts a fully formed article, e.g. fixture data.
    pub async fn insert_article(&self, article: NewsArticle) {
        self.state.write().await.news.push(article);
    }
}

#[async_trait]
impl IdentityRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Identity>> {
        let state = self.state.read().await;
        Ok(state
            .identities
            .iter()
            .find(|stored| stored.identity.id == id)
            .map(|stored| stored.identity.clone()))
    }

    async fn find_credentials(&self, email: &str) -> RepoResult<Option<StoredCredentials>> {
        let state = self.state.read().await;
        Ok(state
            .identities
            .iter()
            .find(|stored| stored.identity.email == email)
            .cloned())
    }

    async fn create(&self, identity: NewIdentity) -> RepoResult<Identity> {
        self.state.write().await.insert_identity(identity)
    }

    async fn list(&self) -> RepoResult<Vec<Identity>> {
        let state = self.state.read().await;
        Ok(state
            .identities
            .iter()
            .map(|stored| stored.identity.clone())
            .collect())
    }

    async fn update_approval(
        &self,
        id: Uuid,
        role: Option<Role>,
        status: ApprovalStatus,
    ) -> RepoResult<Option<Identity>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.identity_mut(id) else {
            return Ok(None);
        };

        if let Some(role) = role {
            stored.identity.role = role;
        }
        stored.identity.approval_status = Some(status);
        stored.identity.updated_at = Utc::now();
        Ok(Some(stored.identity.clone()))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        profile: ProfileUpdate,
    ) -> RepoResult<Option<Identity>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.identity_mut(id) else {
            return Ok(None);
        };

        let identity = &mut stored.identity;
        identity.first_name = profile.first_name;
        identity.last_name = profile.last_name;
        identity.phone = profile.phone;
        identity.university = profile.university;
        identity.department = profile.department;
        identity.position = profile.position;
        identity.specialization = profile.specialization;
        identity.updated_at = Utc::now();
        Ok(Some(identity.clone()))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> RepoResult<Option<Identity>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.identity_mut(id) else {
            return Ok(None);
        };

        stored.identity.is_active = active;
        stored.identity.updated_at = Utc::now();
        Ok(Some(stored.identity.clone()))
    }
}

#[async_trait]
impl RegistrationRequestRepository for InMemoryStore {
    async fn create_with_identity(
        &self,
        identity: NewIdentity,
        request: NewRegistrationRequest,
    ) -> RepoResult<(Identity, RegistrationRequest)> {
        let mut state = self.state.write().await;
        let identity = state.insert_identity(identity)?;

        let request = RegistrationRequest {
            id: Uuid::new_v4(),
            identity_id: identity.id,
            profile: request.profile,
            requested_role: request.requested_role,
            request_notes: request.request_notes,
            requested_at: identity.created_at,
            status: ApprovalStatus::Pending,
            admin_notes: None,
            rejection_reason: None,
            decided_by: None,
            decided_by_email: None,
            decided_at: None,
        };
        state.requests.push(request.clone());
        Ok((identity, request))
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RegistrationRequest>> {
        let state = self.state.read().await;
        Ok(state.requests.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<RegistrationRequest>> {
        Ok(self.state.read().await.requests.clone())
    }

    async fn apply_decision(
        &self,
        id: Uuid,
        decision: DecisionRecord,
    ) -> RepoResult<DecisionOutcome> {
        let mut state = self.state.write().await;
        let Some(request) = state.requests.iter_mut().find(|r| r.id == id) else {
            return Ok(DecisionOutcome::NotFound);
        };

        if request.status != ApprovalStatus::Pending {
            return Ok(DecisionOutcome::AlreadyDecided(request.status));
        }

        request.status = decision.status;
        request.admin_notes = decision.admin_notes;
        request.rejection_reason = decision.rejection_reason;
        request.decided_by = Some(decision.decided_by);
        request.decided_by_email = Some(decision.decided_by_email);
        request.decided_at = Some(decision.decided_at);
        Ok(DecisionOutcome::Applied(request.clone()))
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn save(&self, session_id: Uuid, identity: &SessionIdentity) -> RepoResult<()> {
        let mut state = self.state.write().await;
        state
            .sessions
            .entry(session_id)
            .and_modify(|slot| slot.identity = identity.clone())
            .or_insert_with(|| SessionSlot {
                identity: identity.clone(),
                created_at: Utc::now(),
            });
        Ok(())
    }

    async fn load(
        &self,
        session_id: Uuid,
        max_age: Duration,
    ) -> RepoResult<Option<SessionIdentity>> {
        let now = Utc::now();
        Ok(self
            .state
            .read()
            .await
            .sessions
            .get(&session_id)
            .filter(|slot| slot.is_live(now, max_age))
            .map(|slot| slot.identity.clone()))
    }

    async fn clear(&self, session_id: Uuid) -> RepoResult<()> {
        self.state.write().await.sessions.remove(&session_id);
        Ok(())
    }

    async fn clear_identity(&self, identity_id: Uuid) -> RepoResult<u64> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state
            .sessions
            .retain(|_, slot| slot.identity.id != identity_id);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn prune_expired(&self, max_age: Duration) -> RepoResult<u64> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, slot| slot.is_live(now, max_age));
        Ok((before - state.sessions.len()) as u64)
    }
}

fn document_from_input(id: Uuid, input: DocumentInput, uploaded_by: &str) -> Document {
    Document {
        id,
        title: input.title,
        description: input.description,
        file_name: input.file_name,
        file_type: input.file_type,
        file_size: input.file_size,
        category: input.category,
        is_public: input.is_public,
        uploaded_by: uploaded_by.to_string(),
        uploaded_at: Utc::now(),
        download_count: 0,
        view_count: 0,
    }
}

#[async_trait]
impl DocumentRepository for InMemoryStore {
    async fn list(&self) -> RepoResult<Vec<Document>> {
        Ok(self.state.read().await.documents.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Document>> {
        let state = self.state.read().await;
        Ok(state.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn create(&self, input: DocumentInput, uploaded_by: &str) -> RepoResult<Document> {
        let document = document_from_input(Uuid::new_v4(), input, uploaded_by);
        self.state.write().await.documents.push(document.clone());
        Ok(document)
    }

    async fn update(&self, id: Uuid, input: DocumentInput) -> RepoResult<Option<Document>> {
        let mut state = self.state.write().await;
        let Some(document) = state.documents.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };

        document.title = input.title;
        document.description = input.description;
        document.file_name = input.file_name;
        document.file_type = input.file_type;
        document.file_size = input.file_size;
        document.category = input.category;
        document.is_public = input.is_public;
        Ok(Some(document.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.documents.len();
        state.documents.retain(|d| d.id != id);
        Ok(state.documents.len() != before)
    }

    async fn increment_downloads(&self, id: Uuid) -> RepoResult<Option<Document>> {
        let mut state = self.state.write().await;
        Ok(state.documents.iter_mut().find(|d| d.id == id).map(|d| {
            d.download_count += 1;
            d.clone()
        }))
    }
}

#[async_trait]
impl NewsRepository for InMemoryStore {
    async fn list(&self) -> RepoResult<Vec<NewsArticle>> {
        Ok(self.state.read().await.news.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<NewsArticle>> {
        let state = self.state.read().await;
        Ok(state.news.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, input: NewsInput, author: &str) -> RepoResult<NewsArticle> {
        let article = NewsArticle {
            id: Uuid::new_v4(),
            title: input.title,
            excerpt: input.excerpt,
            content: input.content,
            author: author.to_string(),
            category: input.category,
            status: input.status,
            is_featured: input.is_featured,
            image_url: input.image_url,
            published_at: input.published_at.unwrap_or_else(Utc::now),
            view_count: 0,
        };
        self.state.write().await.news.push(article.clone());
        Ok(article)
    }

    async fn update(&self, id: Uuid, input: NewsInput) -> RepoResult<Option<NewsArticle>> {
        let mut state = self.state.write().await;
        let Some(article) = state.news.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };

        article.title = input.title;
        article.excerpt = input.excerpt;
        article.content = input.content;
        article.category = input.category;
        article.status = input.status;
        article.is_featured = input.is_featured;
        article.image_url = input.image_url;
        if let Some(published_at) = input.published_at {
            article.published_at = published_at;
        }
        Ok(Some(article.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.news.len();
        state.news.retain(|a| a.id != id);
        Ok(state.news.len() != before)
    }

    async fn increment_views(&self, id: Uuid) -> RepoResult<Option<NewsArticle>> {
        let mut state = self.state.write().await;
        Ok(state.news.iter_mut().find(|a| a.id == id).map(|a| {
            a.view_count += 1;
            a.clone()
        }))
    }
}

#[async_trait]
impl StorageHealth for InMemoryStore {
    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicantProfile, RequestedRole};

    fn new_identity(email: &str) -> NewIdentity {
        NewIdentity {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Benali".to_string(),
            role: Role::Visitor,
            phone: None,
            member_id: None,
            approval_status: Some(ApprovalStatus::Pending),
            requested_role: Some(RequestedRole::Member),
            university: None,
            department: None,
            position: None,
            specialization: None,
            directory_visible: true,
        }
    }

    fn new_request(email: &str) -> NewRegistrationRequest {
        NewRegistrationRequest {
            profile: ApplicantProfile {
                first_name: "Amina".to_string(),
                last_name: "Benali".to_string(),
                email: email.to_string(),
                phone: None,
                member_id: None,
                university: None,
                department: None,
                position: None,
                specialization: None,
            },
            requested_role: RequestedRole::Member,
            request_notes: None,
        }
    }

    fn decision(status: ApprovalStatus) -> DecisionRecord {
        DecisionRecord {
            status,
            admin_notes: None,
            rejection_reason: None,
            decided_by: Uuid::new_v4(),
            decided_by_email: "admin@example.org".to_string(),
            decided_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_and_writes_nothing() {
        let store = InMemoryStore::new();
        store
            .create_with_identity(new_identity("a@example.org"), new_request("a@example.org"))
            .await
            .unwrap();

        let result = store
            .create_with_identity(new_identity("a@example.org"), new_request("a@example.org"))
            .await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(IdentityRepository::list(&store).await.unwrap().len(), 1);
        assert_eq!(RegistrationRequestRepository::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = InMemoryStore::new();
        IdentityRepository::create(&store, new_identity("Amina@example.org"))
            .await
            .unwrap();

        assert!(store.find_credentials("Amina@example.org").await.unwrap().is_some());
        assert!(store.find_credentials("amina@example.org").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_requests_keep_insertion_order() {
        let store = InMemoryStore::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            let email = format!("user{}@example.org", i);
            let (_, request) = store
                .create_with_identity(new_identity(&email), new_request(&email))
                .await
                .unwrap();
            ids.push(request.id);
        }

        let listed: Vec<Uuid> = RegistrationRequestRepository::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_apply_decision_only_once() {
        let store = InMemoryStore::new();
        let (_, request) = store
            .create_with_identity(new_identity("a@example.org"), new_request("a@example.org"))
            .await
            .unwrap();

        let first = store
            .apply_decision(request.id, decision(ApprovalStatus::Approved))
            .await
            .unwrap();
        assert!(matches!(first, DecisionOutcome::Applied(ref r) if r.status == ApprovalStatus::Approved));

        let second = store
            .apply_decision(request.id, decision(ApprovalStatus::Rejected))
            .await
            .unwrap();
        assert_eq!(second, DecisionOutcome::AlreadyDecided(ApprovalStatus::Approved));

        let stored = RegistrationRequestRepository::find_by_id(&store, request.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ApprovalStatus::Approved);
    }

    #[tokio::test]
    async fn test_concurrent_decisions_have_one_winner() {
        let store = InMemoryStore::new();
        let (_, request) = store
            .create_with_identity(new_identity("a@example.org"), new_request("a@example.org"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            let status = if i % 2 == 0 {
                ApprovalStatus::Approved
            } else {
                ApprovalStatus::Rejected
            };
            handles.push(tokio::spawn(async move {
                store.apply_decision(request.id, decision(status)).await
            }));
        }

        let mut applied = 0;
        for handle in handles {
            if let DecisionOutcome::Applied(_) = handle.await.unwrap().unwrap() {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn test_apply_decision_unknown_id() {
        let store = InMemoryStore::new();
        let outcome = store
            .apply_decision(Uuid::new_v4(), decision(ApprovalStatus::Approved))
            .await
            .unwrap();
        assert_eq!(outcome, DecisionOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_session_slots() {
        let store = InMemoryStore::new();
        let identity = IdentityRepository::create(&store, new_identity("a@example.org"))
            .await
            .unwrap();
        let session_id = Uuid::new_v4();
        let hour = Duration::hours(1);

        store.save(session_id, &identity.session_view()).await.unwrap();
        assert_eq!(
            store.load(session_id, hour).await.unwrap(),
            Some(identity.session_view())
        );

        store.clear(session_id).await.unwrap();
        store.clear(session_id).await.unwrap();
        assert_eq!(store.load(session_id, hour).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_slots_are_absent_and_pruned() {
        let store = InMemoryStore::new();
        let identity = IdentityRepository::create(&store, new_identity("a@example.org"))
            .await
            .unwrap();
        let stale = Uuid::new_v4();
        let fresh = Uuid::new_v4();

        store.save(stale, &identity.session_view()).await.unwrap();
        store.save(fresh, &identity.session_view()).await.unwrap();
        store
            .state
            .write()
            .await
            .sessions
            .get_mut(&stale)
            .unwrap()
            .created_at -= Duration::hours(2);

        let hour = Duration::hours(1);
        assert_eq!(store.load(stale, hour).await.unwrap(), None);
        assert!(store.load(fresh, hour).await.unwrap().is_some());

        assert_eq!(store.prune_expired(hour).await.unwrap(), 1);
        assert_eq!(store.state.read().await.sessions.len(), 1);
        assert_eq!(store.prune_expired(hour).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resaving_a_slot_keeps_its_age() {
        let store = InMemoryStore::new();
        let identity = IdentityRepository::create(&store, new_identity("a@example.org"))
            .await
            .unwrap();
        let session_id = Uuid::new_v4();

        store.save(session_id, &identity.session_view()).await.unwrap();
        store
            .state
            .write()
            .await
            .sessions
            .get_mut(&session_id)
            .unwrap()
            .created_at -= Duration::hours(2);
        store.save(session_id, &identity.session_view()).await.unwrap();

        assert_eq!(
            store.load(session_id, Duration::hours(1)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_update_approval_keeps_role_when_none() {
        let store = InMemoryStore::new();
        let identity = IdentityRepository::create(&store, new_identity("a@example.org"))
            .await
            .unwrap();

        let updated = store
            .update_approval(identity.id, None, ApprovalStatus::Rejected)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::Visitor);
        assert_eq!(updated.approval_status, Some(ApprovalStatus::Rejected));
    }

    #[tokio::test]
    async fn test_profile_and_activity_updates() {
        let store = InMemoryStore::new();
        let identity = IdentityRepository::create(&store, new_identity("a@example.org"))
            .await
            .unwrap();
        assert!(identity.is_active);

        let updated = store
            .update_profile(
                identity.id,
                ProfileUpdate {
                    first_name: "Amina".to_string(),
                    last_name: "El Fassi".to_string(),
                    phone: Some("+212 6 00 00 00 00".to_string()),
                    university: None,
                    department: Some("Physics".to_string()),
                    position: None,
                    specialization: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.last_name, "El Fassi");
        assert_eq!(updated.department.as_deref(), Some("Physics"));
        assert_eq!(updated.email, identity.email);
        assert_eq!(updated.role, identity.role);

        let deactivated = store.set_active(identity.id, false).await.unwrap().unwrap();
        assert!(!deactivated.is_active);
        assert!(store.set_active(Uuid::new_v4(), false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_identity_sessions() {
        let store = InMemoryStore::new();
        let first = IdentityRepository::create(&store, new_identity("a@example.org"))
            .await
            .unwrap();
        let second = IdentityRepository::create(&store, new_identity("b@example.org"))
            .await
            .unwrap();
        let other = Uuid::new_v4();

        store.save(Uuid::new_v4(), &first.session_view()).await.unwrap();
        store.save(Uuid::new_v4(), &first.session_view()).await.unwrap();
        store.save(other, &second.session_view()).await.unwrap();

        assert_eq!(store.clear_identity(first.id).await.unwrap(), 2);
        assert!(store.load(other, Duration::hours(1)).await.unwrap().is_some());
    }
}
