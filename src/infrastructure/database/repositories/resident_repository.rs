//! SeaORM implementation of ResidentRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{contains_ignore_case, db_err, insert_err};
use crate::domain::resident::{NewResident, Resident, ResidentCriteria, ResidentRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::resident;
use crate::shared::pagination::{Page, PageRequest};

pub struct SeaOrmResidentRepository {
    db: DatabaseConnection,
}

impl SeaOrmResidentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: resident::Model) -> Resident {
    Resident {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        community_id: m.community_id,
    }
}

#[async_trait]
impl ResidentRepository for SeaOrmResidentRepository {
    async fn insert(&self, r: NewResident) -> DomainResult<Resident> {
        debug!("Creating resident {} in community {}", r.email, r.community_id);

        let (email, community_id) = (r.email.clone(), r.community_id);
        let model = resident::ActiveModel {
            first_name: Set(r.first_name),
            last_name: Set(r.last_name),
            email: Set(r.email),
            community_id: Set(r.community_id),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await.map_err(|e| {
            insert_err(e, || {
                format!(
                    "A resident with email {} already exists in community {}",
                    email, community_id
                )
            })
        })?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Resident>> {
        let model = resident::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_community_and_email(
        &self,
        community_id: i64,
        email: &str,
    ) -> DomainResult<Option<Resident>> {
        let model = resident::Entity::find()
            .filter(resident::Column::CommunityId.eq(community_id))
            .filter(resident::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn search(
        &self,
        community_id: i64,
        criteria: &ResidentCriteria,
        page: PageRequest,
    ) -> DomainResult<Page<Resident>> {
        let mut query =
            resident::Entity::find().filter(resident::Column::CommunityId.eq(community_id));
        if let Some(first) = criteria.first_name.as_deref() {
            query = query.filter(contains_ignore_case(resident::Column::FirstName, first));
        }
        if let Some(last) = criteria.last_name.as_deref() {
            query = query.filter(contains_ignore_case(resident::Column::LastName, last));
        }
        let query = query
            .order_by_asc(resident::Column::FirstName)
            .order_by_asc(resident::Column::Id);

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
