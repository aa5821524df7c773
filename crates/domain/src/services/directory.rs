//! Member directory and user management views over identities.

use std::sync::Arc;

use crate::errors::DomainResult;
use crate::models::{
    Identity, IdentityFilter, IdentityStats, MemberEntry, MemberQuery, Role, SessionIdentity,
};
use crate::repositories::IdentityRepository;

#[derive(Clone)]
pub struct DirectoryService {
    identities: Arc<dyn IdentityRepository>,
}

impl DirectoryService {
    pub fn new(identities: Arc<dyn IdentityRepository>) -> Self {
        Self { identities }
    }

    /// Members, editors and admins, ordered by last then first name.
    pub async fn members(
        &self,
        viewer: &SessionIdentity,
        query: &MemberQuery,
    ) -> DomainResult<Vec<MemberEntry>> {
        let viewer_is_admin = viewer.role == Role::Admin;
        let mut entries: Vec<MemberEntry> = self
            .identities
            .list()
            .await?
            .iter()
            .filter(|identity| query.matches(identity, viewer_is_admin))
            .map(MemberEntry::from)
            .collect();
        entries.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(entries)
    }

    /// Identities matching `filter`, oldest first.
    pub async fn users(&self, filter: &IdentityFilter) -> DomainResult<Vec<Identity>> {
        let identities = self.identities.list().await?;
        Ok(identities.into_iter().filter(|i| filter.matches(i)).collect())
    }

    pub async fn user_stats(&self) -> DomainResult<IdentityStats> {
        let identities = self.identities.list().await?;
        Ok(IdentityStats::from_identities(&identities))
    }
}
