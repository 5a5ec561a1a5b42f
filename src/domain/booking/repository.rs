//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Booking, BookingStatus, NewBooking};
use super::period::BookingFilter;
use crate::domain::DomainResult;
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find booking by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Booking>>;

    /// Whether a RESERVED or ACTIVE booking on `spot_id` intersects `[start, end)`
    async fn exists_overlapping(
        &self,
        spot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// Atomically re-check for overlap and insert. `None` when the slot was
    /// taken in the meantime.
    async fn insert_if_free(&self, booking: NewBooking) -> DomainResult<Option<Booking>>;

    /// Persist status and actual times, but only if the stored status is
    /// still `expected`. Fails with `ConcurrentModification` otherwise.
    async fn update(&self, booking: &Booking, expected: BookingStatus) -> DomainResult<()>;

    /// Page through a resident's bookings, newest window first
    async fn find_by_resident(
        &self,
        resident_id: i64,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Booking>>;
}
