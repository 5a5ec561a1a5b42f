//! Parking spot repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewParkingSpot, ParkingSpot};
use crate::domain::DomainResult;
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait ParkingSpotRepository: Send + Sync {
    /// Insert a spot. Fails with `AlreadyExists` when the code is already
    /// used in the community.
    async fn insert(&self, spot: NewParkingSpot) -> DomainResult<ParkingSpot>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ParkingSpot>>;

    async fn find_by_community_and_code(
        &self,
        community_id: i64,
        code: &str,
    ) -> DomainResult<Option<ParkingSpot>>;

    /// List a community's spots, ordered by code
    async fn search(
        &self,
        community_id: i64,
        code: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>>;

    /// Spots of the community with no RESERVED/ACTIVE booking intersecting
    /// `[start, end)`, ordered by code
    async fn search_available(
        &self,
        community_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        code: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<ParkingSpot>>;
}
