//! SeaORM implementation of CommunityRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::{contains_ignore_case, db_err};
use crate::domain::community::{Community, CommunityRepository, NewCommunity};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::community;
use crate::shared::pagination::{Page, PageRequest};

pub struct SeaOrmCommunityRepository {
    db: DatabaseConnection,
}

impl SeaOrmCommunityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: community::Model) -> Community {
    Community {
        id: m.id,
        name: m.name,
    }
}

#[async_trait]
impl CommunityRepository for SeaOrmCommunityRepository {
    async fn insert(&self, c: NewCommunity) -> DomainResult<Community> {
        debug!("Creating community: {}", c.name);

        let model = community::ActiveModel {
            name: Set(c.name),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Community>> {
        let model = community::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn search(&self, name: Option<&str>, page: PageRequest) -> DomainResult<Page<Community>> {
        let mut query = community::Entity::find();
        if let Some(name) = name {
            query = query.filter(contains_ignore_case(community::Column::Name, name));
        }
        let query = query
            .order_by_asc(community::Column::Name)
            .order_by_asc(community::Column::Id);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .offset(page.offset())
            .limit(page.size)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Page::new(
            models.into_iter().map(model_to_domain).collect(),
            page,
            total,
        ))
    }
}
