//! Resident repository interface

use async_trait::async_trait;

use super::model::{NewResident, Resident, ResidentCriteria};
use crate::domain::DomainResult;
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait ResidentRepository: Send + Sync {
    /// Insert a resident. Fails with `AlreadyExists` when the email is
    /// already registered in the community.
    async fn insert(&self, resident: NewResident) -> DomainResult<Resident>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Resident>>;

    async fn find_by_community_and_email(
        &self,
        community_id: i64,
        email: &str,
    ) -> DomainResult<Option<Resident>>;

    /// List a community's residents, ordered by first name
    async fn search(
        &self,
        community_id: i64,
        criteria: &ResidentCriteria,
        page: PageRequest,
    ) -> DomainResult<Page<Resident>>;
}
