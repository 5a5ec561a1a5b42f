//! Parking spot business logic service
//!
//! Availability is never stored on the spot; it is derived from the
//! RESERVED/ACTIVE bookings overlapping the requested window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::parking_spot::{NewParkingSpot, ParkingSpot};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::pagination::{Page, PageRequest};

pub struct ParkingSpotService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ParkingSpotService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn require_community(&self, community_id: i64) -> DomainResult<()> {
        match self.repos.communities().find_by_id(community_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::CommunityNotFound(community_id)),
        }
    }

    pub async fn create(&self, code: &str, community_id: i64) -> DomainResult<ParkingSpot> {
        let request = NewParkingSpot::new(code, community_id)?;
        self.require_community(community_id).await?;

        let existing = self
            .repos
            .parking_spots()
            .find_by_community_and_code(community_id, &request.code)
            .await?;
        if existing.is_some() {
            return Err(DomainError::AlreadyExists(format!(
                "A parking spot with code {} already exists in community {}",
                request.code, community_id
            )));
        }

        let spot = self.repos.parking_spots().insert(request).await?;
        info!(spot_id = spot.id, code = %spot.code, community_id, "Parking spot created");
        Ok(spot)
    }

    pub async fn get(&self, id: i64) -> DomainResult<ParkingSpot> {
        self.repos
            .parking_spots()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::SpotNotFound(id))
    }

    pub async fn list_by_community(
        &self,
        community_id: i64,
        code: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>> {
        self.require_community(community_id).await?;
        self.repos
            .parking_spots()
            .search(community_id, code, page)
            .await
    }

    /// Spots of the community free for the whole of `[start, end)`.
    pub async fn list_available(
        &self,
        community_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        code: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>> {
        if start >= end {
            return Err(DomainError::InvalidPeriod(
                "Start time cannot equal or come after end time".to_string(),
            ));
        }
        self.require_community(community_id).await?;
        self.repos
            .parking_spots()
            .search_available(community_id, start, end, code, page)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::fixtures::{at, world};
    use crate::application::booking::BookingLifecycle;

    #[tokio::test]
    async fn create_rejects_duplicate_codes_and_unknown_communities() {
        let w = world().await;
        let service = ParkingSpotService::new(w.repos.clone());

        let b2 = service.create("B-02", w.spot.community_id).await.unwrap();
        assert_eq!(service.get(b2.id).await.unwrap(), b2);

        let err = service.create("A-01", w.spot.community_id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));

        let err = service.create("C-01", 999).await.unwrap_err();
        assert!(matches!(err, DomainError::CommunityNotFound(999)));

        assert!(matches!(
            service.get(999).await.unwrap_err(),
            DomainError::SpotNotFound(999)
        ));
    }

    #[tokio::test]
    async fn availability_is_derived_from_bookings() {
        let w = world().await;
        let service = ParkingSpotService::new(w.repos.clone());
        let engine = BookingLifecycle::new(w.repos.clone(), w.clock.clone());
        let community = w.spot.community_id;
        let spare = service.create("B-02", community).await.unwrap();

        let booking = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();

        let free = service
            .list_available(community, at(11, 0), at(13, 0), None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(free.items, vec![spare.clone()]);

        engine.cancel(booking.id).await.unwrap();
        let free = service
            .list_available(community, at(11, 0), at(13, 0), None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(free.total_elements, 2);

        let listed = service
            .list_by_community(community, Some("b-"), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(listed.items, vec![spare]);

        let err = service
            .list_available(community, at(13, 0), at(11, 0), None, PageRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPeriod(_)));
    }
}
