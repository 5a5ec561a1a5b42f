//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, DbErr, EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_err, is_contention};
use crate::domain::booking::{Booking, BookingFilter, BookingRepository, BookingStatus, NewBooking};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, parking_spot};
use crate::shared::pagination::{Page, PageRequest};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Overlap check and insert in one transaction. The first statement is a
    /// no-op write on the spot row, so the SQLite write lock (or the
    /// PostgreSQL row lock) is held before the check runs. Dropping the
    /// transaction on an error path rolls it back.
    async fn insert_locked(&self, b: &NewBooking) -> Result<Option<booking::Model>, DbErr> {
        // SQLite transactions are already serializable and reject the hint.
        let isolation = match self.db.get_database_backend() {
            DatabaseBackend::Sqlite => None,
            _ => Some(IsolationLevel::Serializable),
        };
        let txn = self.db.begin_with_config(isolation, None).await?;

        parking_spot::Entity::update_many()
            .col_expr(
                parking_spot::Column::Code,
                SimpleExpr::from(Expr::col(parking_spot::Column::Code)),
            )
            .filter(parking_spot::Column::Id.eq(b.spot_id))
            .exec(&txn)
            .await?;

        let clashes = booking::Entity::find()
            .filter(overlapping(b.spot_id, b.start, b.end))
            .count(&txn)
            .await?;
        if clashes > 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let saved = booking::ActiveModel {
            resident_id: Set(b.resident_id),
            spot_id: Set(b.spot_id),
            start_time: Set(b.start),
            end_time: Set(b.end),
            status: Set(booking::Status::Reserved),
            actual_start_time: Set(None),
            actual_end_time: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(Some(saved))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        resident_id: m.resident_id,
        spot_id: m.spot_id,
        start: m.start_time,
        end: m.end_time,
        status: m.status.into(),
        actual_start: m.actual_start_time,
        actual_end: m.actual_end_time,
    }
}

fn overlapping(spot_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(booking::Column::SpotId.eq(spot_id))
        .add(booking::Column::Status.is_in(BookingStatus::HOLDING.map(booking::Status::from)))
        .add(booking::Column::StartTime.lt(end))
        .add(booking::Column::EndTime.gt(start))
}

fn filter_condition(filter: &BookingFilter) -> Condition {
    match filter {
        BookingFilter::EndedBefore { status, before } => Condition::all()
            .add(booking::Column::Status.eq(booking::Status::from(*status)))
            .add(booking::Column::EndTime.lt(*before)),
        BookingFilter::Spanning { statuses, at } => Condition::all()
            .add(booking::Column::Status.is_in(statuses.iter().copied().map(booking::Status::from)))
            .add(booking::Column::StartTime.lte(*at))
            .add(booking::Column::EndTime.gte(*at)),
        BookingFilter::StartsAfter { status, after } => Condition::all()
            .add(booking::Column::Status.eq(booking::Status::from(*status)))
            .add(booking::Column::StartTime.gt(*after)),
        BookingFilter::Status(status) => {
            Condition::all().add(booking::Column::Status.eq(booking::Status::from(*status)))
        }
        BookingFilter::Any => Condition::all(),
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn exists_overlapping(
        &self,
        spot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let count = booking::Entity::find()
            .filter(overlapping(spot_id, start, end))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert_if_free(&self, b: NewBooking) -> DomainResult<Option<Booking>> {
        debug!(
            "Inserting booking for spot {} [{} .. {})",
            b.spot_id, b.start, b.end
        );

        match self.insert_locked(&b).await {
            Ok(saved) => Ok(saved.map(model_to_domain)),
            Err(e) if is_contention(&e) => {
                warn!("Booking insert for spot {} lost a write race: {}", b.spot_id, e);
                Ok(None)
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn update(&self, b: &Booking, expected: BookingStatus) -> DomainResult<()> {
        debug!("Updating booking {}: {} -> {}", b.id, expected, b.status);

        let result = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(booking::Status::from(b.status)))
            .col_expr(booking::Column::ActualStartTime, Expr::value(b.actual_start))
            .col_expr(booking::Column::ActualEndTime, Expr::value(b.actual_end))
            .filter(booking::Column::Id.eq(b.id))
            .filter(booking::Column::Status.eq(booking::Status::from(expected)))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return match self.find_by_id(b.id).await? {
                Some(_) => Err(DomainError::ConcurrentModification(b.id)),
                None => Err(DomainError::BookingNotFound(b.id)),
            };
        }
        Ok(())
    }

    async fn find_by_resident(
        &self,
        resident_id: i64,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Booking>> {
        let query = booking::Entity::find()
            .filter(booking::Column::ResidentId.eq(resident_id))
            .filter(filter_condition(filter))
            .order_by_desc(booking::Column::StartTime)
            .order_by_desc(booking::Column::Id);

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

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingPeriod;
    use crate::domain::community::{CommunityRepository, NewCommunity};
    use crate::domain::parking_spot::{NewParkingSpot, ParkingSpotRepository};
    use crate::domain::resident::{NewResident, ResidentRepository};
    use crate::infrastructure::database::repositories::community_repository::SeaOrmCommunityRepository;
    use crate::infrastructure::database::repositories::parking_spot_repository::SeaOrmParkingSpotRepository;
    use crate::infrastructure::database::repositories::resident_repository::SeaOrmResidentRepository;
    use crate::infrastructure::database::repositories::test_support::memory_db;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, h, 0, 0).unwrap()
    }

    /// Returns (repo, resident id, spot id)
    async fn setup() -> (SeaOrmBookingRepository, i64, i64) {
        let db = memory_db().await;
        let community = SeaOrmCommunityRepository::new(db.clone())
            .insert(NewCommunity::new("Maple Court").unwrap())
            .await
            .unwrap();
        let resident = SeaOrmResidentRepository::new(db.clone())
            .insert(NewResident::new("Ann", "Lee", "ann@example.com", community.id).unwrap())
            .await
            .unwrap();
        let spot = SeaOrmParkingSpotRepository::new(db.clone())
            .insert(NewParkingSpot::new("A-01", community.id).unwrap())
            .await
            .unwrap();
        (SeaOrmBookingRepository::new(db), resident.id, spot.id)
    }

    #[tokio::test]
    async fn insert_if_free_checks_half_open_overlap() {
        let (repo, resident, spot) = setup().await;

        let first = repo
            .insert_if_free(NewBooking::new(resident, spot, at(10), at(12)).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, BookingStatus::Reserved);
        assert_eq!(repo.find_by_id(first.id).await.unwrap(), Some(first));

        assert!(repo
            .insert_if_free(NewBooking::new(resident, spot, at(11), at(13)).unwrap())
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .insert_if_free(NewBooking::new(resident, spot, at(12), at(13)).unwrap())
            .await
            .unwrap()
            .is_some());

        assert!(repo.exists_overlapping(spot, at(9), at(11)).await.unwrap());
        assert!(!repo.exists_overlapping(spot, at(13), at(14)).await.unwrap());
    }

    #[tokio::test]
    async fn update_enforces_expected_status() {
        let (repo, resident, spot) = setup().await;
        let mut b = repo
            .insert_if_free(NewBooking::new(resident, spot, at(10), at(12)).unwrap())
            .await
            .unwrap()
            .unwrap();

        b.park(at(10)).unwrap();
        repo.update(&b, BookingStatus::Reserved).await.unwrap();
        let stored = repo.find_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Active);
        assert_eq!(stored.actual_start, Some(at(10)));

        let err = repo.update(&b, BookingStatus::Reserved).await.unwrap_err();
        assert!(matches!(err, DomainError::ConcurrentModification(_)));

        let mut ghost = b.clone();
        ghost.id = 999;
        let err = repo.update(&ghost, BookingStatus::Active).await.unwrap_err();
        assert!(matches!(err, DomainError::BookingNotFound(999)));
    }

    #[tokio::test]
    async fn find_by_resident_applies_period_filters() {
        let (repo, resident, spot) = setup().await;
        let mut early = repo
            .insert_if_free(NewBooking::new(resident, spot, at(1), at(2)).unwrap())
            .await
            .unwrap()
            .unwrap();
        early.park(at(1)).unwrap();
        repo.update(&early, BookingStatus::Reserved).await.unwrap();
        early.release(at(2)).unwrap();
        repo.update(&early, BookingStatus::Active).await.unwrap();

        let now = repo
            .insert_if_free(NewBooking::new(resident, spot, at(5), at(7)).unwrap())
            .await
            .unwrap()
            .unwrap();
        let later = repo
            .insert_if_free(NewBooking::new(resident, spot, at(9), at(10)).unwrap())
            .await
            .unwrap()
            .unwrap();

        let ids = |page: Page<Booking>| page.items.into_iter().map(|b| b.id).collect::<Vec<_>>();
        let query = |period: BookingPeriod| {
            let filter = period.filter(at(6));
            let repo = &repo;
            async move {
                repo.find_by_resident(resident, &filter, PageRequest::default())
                    .await
                    .unwrap()
            }
        };

        assert_eq!(ids(query(BookingPeriod::Past).await), vec![early.id]);
        assert_eq!(ids(query(BookingPeriod::Current).await), vec![now.id]);
        assert_eq!(ids(query(BookingPeriod::Future).await), vec![later.id]);
        assert!(query(BookingPeriod::Cancelled).await.items.is_empty());
        assert_eq!(
            ids(query(BookingPeriod::All).await),
            vec![later.id, now.id, early.id]
        );

        let second = repo
            .find_by_resident(resident, &BookingFilter::Any, PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(second.total_elements, 3);
        assert_eq!(second.total_pages, 2);
        assert_eq!(ids(second), vec![early.id]);
    }
}
