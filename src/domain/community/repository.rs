//! Community repository interface

use async_trait::async_trait;

use super::model::{Community, NewCommunity};
use crate::domain::DomainResult;
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait CommunityRepository: Send + Sync {
    async fn insert(&self, community: NewCommunity) -> DomainResult<Community>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Community>>;

    /// Case-insensitive substring search on name, ordered by name
    async fn search(&self, name: Option<&str>, page: PageRequest) -> DomainResult<Page<Community>>;
}
