//! Resident business logic service

use std::sync::Arc;

use tracing::info;

use crate::domain::resident::{NewResident, Resident, ResidentCriteria};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::pagination::{Page, PageRequest};

pub struct ResidentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ResidentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn require_community(&self, community_id: i64) -> DomainResult<()> {
        match self.repos.communities().find_by_id(community_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::CommunityNotFound(community_id)),
        }
    }

    /// Register a resident. Emails are unique per community.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        community_id: i64,
    ) -> DomainResult<Resident> {
        let request = NewResident::new(first_name, last_name, email, community_id)?;
        self.require_community(community_id).await?;

        let existing = self
            .repos
            .residents()
            .find_by_community_and_email(community_id, &request.email)
            .await?;
        if existing.is_some() {
            return Err(DomainError::AlreadyExists(format!(
                "A resident with email {} already exists in community {}",
                request.email, community_id
            )));
        }

        let resident = self.repos.residents().insert(request).await?;
        info!(resident_id = resident.id, community_id, "Resident registered");
        Ok(resident)
    }

    pub async fn get(&self, id: i64) -> DomainResult<Resident> {
        self.repos
            .residents()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ResidentNotFound(id))
    }

    pub async fn list_by_community(
        &self,
        community_id: i64,
        criteria: &ResidentCriteria,
        page: PageRequest,
    ) -> DomainResult<Page<Resident>> {
        self.require_community(community_id).await?;
        self.repos
            .residents()
            .search(community_id, criteria, page)
            .await
    }
}
