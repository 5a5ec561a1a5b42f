//! SeaORM implementation of ParkingSpotRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use super::{contains_ignore_case, db_err, insert_err};
use crate::domain::booking::BookingStatus;
use crate::domain::parking_spot::{NewParkingSpot, ParkingSpot, ParkingSpotRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{booking, parking_spot};
use crate::shared::pagination::{Page, PageRequest};

pub struct SeaOrmParkingSpotRepository {
    db: DatabaseConnection,
}

impl SeaOrmParkingSpotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_page(
        &self,
        query: Select<parking_spot::Entity>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>> {
        let query = query
            .order_by_asc(parking_spot::Column::Code)
            .order_by_asc(parking_spot::Column::Id);

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

fn model_to_domain(m: parking_spot::Model) -> ParkingSpot {
    ParkingSpot {
        id: m.id,
        code: m.code,
        community_id: m.community_id,
    }
}

fn community_spots(community_id: i64, code: Option<&str>) -> Select<parking_spot::Entity> {
    let mut query =
        parking_spot::Entity::find().filter(parking_spot::Column::CommunityId.eq(community_id));
    if let Some(code) = code {
        query = query.filter(contains_ignore_case(parking_spot::Column::Code, code));
    }
    query
}

#[async_trait]
impl ParkingSpotRepository for SeaOrmParkingSpotRepository {
    async fn insert(&self, s: NewParkingSpot) -> DomainResult<ParkingSpot> {
        debug!("Creating parking spot {} in community {}", s.code, s.community_id);

        let (code, community_id) = (s.code.clone(), s.community_id);
        let model = parking_spot::ActiveModel {
            code: Set(s.code),
            community_id: Set(s.community_id),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await.map_err(|e| {
            insert_err(e, || {
                format!(
                    "A parking spot with code {} already exists in community {}",
                    code, community_id
                )
            })
        })?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ParkingSpot>> {
        let model = parking_spot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_community_and_code(
        &self,
        community_id: i64,
        code: &str,
    ) -> DomainResult<Option<ParkingSpot>> {
        let model = parking_spot::Entity::find()
            .filter(parking_spot::Column::CommunityId.eq(community_id))
            .filter(parking_spot::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn search(
        &self,
        community_id: i64,
        code: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>> {
        self.fetch_page(community_spots(community_id, code), page).await
    }

    async fn search_available(
        &self,
        community_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        code: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>> {
        let holding = BookingStatus::HOLDING.map(booking::Status::from);
        let taken = Query::select()
            .column(booking::Column::SpotId)
            .from(booking::Entity)
            .and_where(Expr::col(booking::Column::Status).is_in(holding))
            .and_where(Expr::col(booking::Column::StartTime).lt(end))
            .and_where(Expr::col(booking::Column::EndTime).gt(start))
            .to_owned();

        let query = community_spots(community_id, code)
            .filter(parking_spot::Column::Id.not_in_subquery(taken));
        self.fetch_page(query, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{BookingRepository, NewBooking};
    use crate::domain::community::{CommunityRepository, NewCommunity};
    use crate::domain::resident::{NewResident, ResidentRepository};
    use crate::domain::DomainError;
    use crate::infrastructure::database::repositories::booking_repository::SeaOrmBookingRepository;
    use crate::infrastructure::database::repositories::community_repository::SeaOrmCommunityRepository;
    use crate::infrastructure::database::repositories::resident_repository::SeaOrmResidentRepository;
    use crate::infrastructure::database::repositories::test_support::memory_db;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn duplicate_code_in_community_is_rejected() {
        let db = memory_db().await;
        let community = SeaOrmCommunityRepository::new(db.clone())
            .insert(NewCommunity::new("Maple Court").unwrap())
            .await
            .unwrap();
        let repo = SeaOrmParkingSpotRepository::new(db);

        repo.insert(NewParkingSpot::new("A-01", community.id).unwrap())
            .await
            .unwrap();
        let err = repo
            .insert(NewParkingSpot::new("A-01", community.id).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn available_spots_exclude_held_windows_only() {
        let db = memory_db().await;
        let community = SeaOrmCommunityRepository::new(db.clone())
            .insert(NewCommunity::new("Maple Court").unwrap())
            .await
            .unwrap();
        let resident = SeaOrmResidentRepository::new(db.clone())
            .insert(NewResident::new("Ann", "Lee", "ann@example.com", community.id).unwrap())
            .await
            .unwrap();
        let repo = SeaOrmParkingSpotRepository::new(db.clone());
        let a = repo
            .insert(NewParkingSpot::new("A-01", community.id).unwrap())
            .await
            .unwrap();
        let b = repo
            .insert(NewParkingSpot::new("B-01", community.id).unwrap())
            .await
            .unwrap();

        SeaOrmBookingRepository::new(db)
            .insert_if_free(NewBooking::new(resident.id, a.id, at(10), at(12)).unwrap())
            .await
            .unwrap()
            .unwrap();

        let free = repo
            .search_available(community.id, at(11), at(13), None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(free.items, vec![b.clone()]);

        let touching = repo
            .search_available(community.id, at(12), at(13), None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(touching.items, vec![a, b]);

        let all = repo
            .search(community.id, Some("b-"), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_elements, 1);
    }
}
