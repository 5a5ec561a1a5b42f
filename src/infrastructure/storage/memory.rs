//! In-memory storage implementation

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::booking::{Booking, BookingFilter, BookingRepository, BookingStatus, NewBooking};
use crate::domain::community::{Community, CommunityRepository, NewCommunity};
use crate::domain::parking_spot::{NewParkingSpot, ParkingSpot, ParkingSpotRepository};
use crate::domain::resident::{NewResident, Resident, ResidentCriteria, ResidentRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Default)]
struct Tables {
    communities: DashMap<i64, Community>,
    residents: DashMap<i64, Resident>,
    spots: DashMap<i64, ParkingSpot>,
    bookings: DashMap<i64, Booking>,
    id_counter: AtomicI64,
    // Serializes check-then-write sequences (uniqueness, overlap, CAS).
    write_lock: Mutex<()>,
}

impl Tables {
    fn next_id(&self) -> i64 {
        self.id_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn spot_is_held(&self, spot_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.bookings.iter().any(|b| {
            b.spot_id == spot_id && b.status.holds_spot() && b.overlaps(start, end)
        })
    }
}

/// In-memory storage for development and testing
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn communities(&self) -> &dyn CommunityRepository {
        self
    }

    fn residents(&self) -> &dyn ResidentRepository {
        self
    }

    fn parking_spots(&self) -> &dyn ParkingSpotRepository {
        self
    }

    fn bookings(&self) -> &dyn BookingRepository {
        self
    }
}

#[async_trait]
impl CommunityRepository for InMemoryStorage {
    async fn insert(&self, community: NewCommunity) -> DomainResult<Community> {
        let created = Community {
            id: self.tables.next_id(),
            name: community.name,
        };
        self.tables.communities.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Community>> {
        Ok(self.tables.communities.get(&id).map(|c| c.clone()))
    }

    async fn search(&self, name: Option<&str>, page: PageRequest) -> DomainResult<Page<Community>> {
        let needle = name.map(str::to_lowercase);
        let mut all: Vec<Community> = self
            .tables
            .communities
            .iter()
            .filter(|c| {
                needle
                    .as_deref()
                    .map_or(true, |n| c.name.to_lowercase().contains(n))
            })
            .map(|c| c.clone())
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(Page::from_vec(all, page))
    }
}

#[async_trait]
impl ResidentRepository for InMemoryStorage {
    async fn insert(&self, resident: NewResident) -> DomainResult<Resident> {
        let _guard = self.tables.lock();
        let taken = self.tables.residents.iter().any(|r| {
            r.community_id == resident.community_id && r.email == resident.email
        });
        if taken {
            return Err(DomainError::AlreadyExists(format!(
                "A resident with email {} already exists in community {}",
                resident.email, resident.community_id
            )));
        }

        let created = Resident {
            id: self.tables.next_id(),
            first_name: resident.first_name,
            last_name: resident.last_name,
            email: resident.email,
            community_id: resident.community_id,
        };
        self.tables.residents.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Resident>> {
        Ok(self.tables.residents.get(&id).map(|r| r.clone()))
    }

    async fn find_by_community_and_email(
        &self,
        community_id: i64,
        email: &str,
    ) -> DomainResult<Option<Resident>> {
        Ok(self
            .tables
            .residents
            .iter()
            .find(|r| r.community_id == community_id && r.email == email)
            .map(|r| r.clone()))
    }

    async fn search(
        &self,
        community_id: i64,
        criteria: &ResidentCriteria,
        page: PageRequest,
    ) -> DomainResult<Page<Resident>> {
        let mut all: Vec<Resident> = self
            .tables
            .residents
            .iter()
            .filter(|r| r.community_id == community_id && criteria.matches(r))
            .map(|r| r.clone())
            .collect();
        all.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.id.cmp(&b.id)));
        Ok(Page::from_vec(all, page))
    }
}

#[async_trait]
impl ParkingSpotRepository for InMemoryStorage {
    async fn insert(&self, spot: NewParkingSpot) -> DomainResult<ParkingSpot> {
        let _guard = self.tables.lock();
        let taken = self
            .tables
            .spots
            .iter()
            .any(|s| s.community_id == spot.community_id && s.code == spot.code);
        if taken {
            return Err(DomainError::AlreadyExists(format!(
                "A parking spot with code {} already exists in community {}",
                spot.code, spot.community_id
            )));
        }

        let created = ParkingSpot {
            id: self.tables.next_id(),
            code: spot.code,
            community_id: spot.community_id,
        };
        self.tables.spots.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ParkingSpot>> {
        Ok(self.tables.spots.get(&id).map(|s| s.clone()))
    }

    async fn find_by_community_and_code(
        &self,
        community_id: i64,
        code: &str,
    ) -> DomainResult<Option<ParkingSpot>> {
        Ok(self
            .tables
            .spots
            .iter()
            .find(|s| s.community_id == community_id && s.code == code)
            .map(|s| s.clone()))
    }

    async fn search(
        &self,
        community_id: i64,
        code: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>> {
        let mut all: Vec<ParkingSpot> = self
            .tables
            .spots
            .iter()
            .filter(|s| s.community_id == community_id && s.code_matches(code))
            .map(|s| s.clone())
            .collect();
        all.sort_by(|a, b| a.code.cmp(&b.code).then(a.id.cmp(&b.id)));
        Ok(Page::from_vec(all, page))
    }

    async fn search_available(
        &self,
        community_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        code: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>> {
        let mut all: Vec<ParkingSpot> = self
            .tables
            .spots
            .iter()
            .filter(|s| s.community_id == community_id && s.code_matches(code))
            .map(|s| s.clone())
            .collect();
        all.retain(|s| !self.tables.spot_is_held(s.id, start, end));
        all.sort_by(|a, b| a.code.cmp(&b.code).then(a.id.cmp(&b.id)));
        Ok(Page::from_vec(all, page))
    }
}

#[async_trait]
impl BookingRepository for InMemoryStorage {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Booking>> {
        Ok(self.tables.bookings.get(&id).map(|b| b.clone()))
    }

    async fn exists_overlapping(
        &self,
        spot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self.tables.spot_is_held(spot_id, start, end))
    }

    async fn insert_if_free(&self, booking: NewBooking) -> DomainResult<Option<Booking>> {
        let _guard = self.tables.lock();
        if self
            .tables
            .spot_is_held(booking.spot_id, booking.start, booking.end)
        {
            return Ok(None);
        }
        let created = booking.into_booking(self.tables.next_id());
        self.tables.bookings.insert(created.id, created.clone());
        Ok(Some(created))
    }

    async fn update(&self, booking: &Booking, expected: BookingStatus) -> DomainResult<()> {
        let _guard = self.tables.lock();
        let mut stored = self
            .tables
            .bookings
            .get_mut(&booking.id)
            .ok_or(DomainError::BookingNotFound(booking.id))?;
        if stored.status != expected {
            return Err(DomainError::ConcurrentModification(booking.id));
        }
        stored.status = booking.status;
        stored.actual_start = booking.actual_start;
        stored.actual_end = booking.actual_end;
        Ok(())
    }

    async fn find_by_resident(
        &self,
        resident_id: i64,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Booking>> {
        let mut all: Vec<Booking> = self
            .tables
            .bookings
            .iter()
            .filter(|b| b.resident_id == resident_id && filter.matches(b))
            .map(|b| b.clone())
            .collect();
        all.sort_by(|a, b| b.start.cmp(&a.start).then(b.id.cmp(&a.id)));
        Ok(Page::from_vec(all, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn insert_if_free_refuses_overlap_but_accepts_touching() {
        let store = InMemoryStorage::new();
        let first = NewBooking::new(1, 10, at(10), at(12)).unwrap();
        assert!(store.insert_if_free(first).await.unwrap().is_some());

        let clash = NewBooking::new(2, 10, at(11), at(13)).unwrap();
        assert!(store.insert_if_free(clash).await.unwrap().is_none());

        let touching = NewBooking::new(2, 10, at(12), at(13)).unwrap();
        assert!(store.insert_if_free(touching).await.unwrap().is_some());

        let other_spot = NewBooking::new(2, 11, at(10), at(12)).unwrap();
        assert!(store.insert_if_free(other_spot).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_is_compare_and_set_on_status() {
        let store = InMemoryStorage::new();
        let mut b = store
            .insert_if_free(NewBooking::new(1, 10, at(10), at(12)).unwrap())
            .await
            .unwrap()
            .unwrap();

        b.status = BookingStatus::Cancelled;
        store.update(&b, BookingStatus::Reserved).await.unwrap();

        b.status = BookingStatus::Active;
        let err = store.update(&b, BookingStatus::Reserved).await.unwrap_err();
        assert!(matches!(err, DomainError::ConcurrentModification(_)));
    }

    #[tokio::test]
    async fn cancelled_bookings_free_the_slot() {
        let store = InMemoryStorage::new();
        let mut b = store
            .insert_if_free(NewBooking::new(1, 10, at(10), at(12)).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(store.exists_overlapping(10, at(11), at(13)).await.unwrap());

        b.status = BookingStatus::Cancelled;
        store.update(&b, BookingStatus::Reserved).await.unwrap();
        assert!(!store.exists_overlapping(10, at(11), at(13)).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_resident_email_in_same_community_is_rejected() {
        let store = InMemoryStorage::new();
        let resident = NewResident::new("Ann", "Lee", "ann@example.com", 1).unwrap();
        ResidentRepository::insert(&store, resident.clone()).await.unwrap();

        let err = ResidentRepository::insert(&store, resident.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));

        let elsewhere = NewResident {
            community_id: 2,
            ..resident
        };
        assert!(ResidentRepository::insert(&store, elsewhere).await.is_ok());
    }
}
