//! Community business logic service

use std::sync::Arc;

use tracing::info;

use crate::domain::community::{Community, NewCommunity};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::pagination::{Page, PageRequest};

pub struct CommunityService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CommunityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, name: &str) -> DomainResult<Community> {
        let community = self
            .repos
            .communities()
            .insert(NewCommunity::new(name)?)
            .await?;
        info!(community_id = community.id, name = %community.name, "Community created");
        Ok(community)
    }

    pub async fn get(&self, id: i64) -> DomainResult<Community> {
        self.repos
            .communities()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::CommunityNotFound(id))
    }

    pub async fn list(&self, name: Option<&str>, page: PageRequest) -> DomainResult<Page<Community>> {
        self.repos.communities().search(name, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStorage;

    #[tokio::test]
    async fn create_get_and_list() {
        let service = CommunityService::new(Arc::new(InMemoryStorage::new()));
        let maple = service.create("  Maple Court ").await.unwrap();
        service.create("Birch Hollow").await.unwrap();

        assert_eq!(service.get(maple.id).await.unwrap().name, "Maple Court");
        assert!(matches!(
            service.get(404).await.unwrap_err(),
            DomainError::CommunityNotFound(404)
        ));
        assert!(matches!(
            service.create(" ").await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let all = service.list(None, PageRequest::default()).await.unwrap();
        let names: Vec<_> = all.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Birch Hollow", "Maple Court"]);

        let some = service.list(Some("MAPLE"), PageRequest::default()).await.unwrap();
        assert_eq!(some.total_elements, 1);
    }
}
