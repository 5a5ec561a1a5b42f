//! Booking read side
//!
//! Every booking leaving this service has been passed through
//! [`reconcile`]; when that changes its status the change is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::booking::{reconcile, Booking, BookingPeriod};
use crate::domain::community::Community;
use crate::domain::parking_spot::ParkingSpot;
use crate::domain::resident::Resident;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::pagination::{Page, PageRequest};
use crate::shared::SharedClock;

/// A booking together with the records it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub resident: Resident,
    pub spot: ParkingSpot,
    pub community: Community,
}

pub struct BookingQueryService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl BookingQueryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    /// Page through a resident's bookings for `period`.
    ///
    /// Filtering runs on stored statuses; the returned items carry the
    /// reconciled ones.
    pub async fn list_by_resident(
        &self,
        resident_id: i64,
        period: BookingPeriod,
        page: PageRequest,
    ) -> DomainResult<Page<Booking>> {
        if self.repos.residents().find_by_id(resident_id).await?.is_none() {
            return Err(DomainError::ResidentNotFound(resident_id));
        }

        let now = self.clock.now();
        let filter = period.filter(now);
        let found = self
            .repos
            .bookings()
            .find_by_resident(resident_id, &filter, page)
            .await?;

        let mut items = Vec::with_capacity(found.items.len());
        for booking in found.items.iter().cloned() {
            items.push(self.reconciled(booking, now).await?);
        }
        Ok(Page { items, ..found })
    }

    pub async fn get(&self, id: i64) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::BookingNotFound(id))?;
        self.reconciled(booking, self.clock.now()).await
    }

    /// Resolve resident, spot and community for a booking.
    pub async fn describe(&self, booking: Booking) -> DomainResult<BookingDetails> {
        let mut communities = HashMap::new();
        self.describe_with(booking, &mut communities).await
    }

    /// [`describe`](Self::describe) over a page, sharing lookups between items.
    pub async fn describe_page(&self, page: Page<Booking>) -> DomainResult<Page<BookingDetails>> {
        let mut communities = HashMap::new();
        let mut items = Vec::with_capacity(page.items.len());
        for booking in page.items.iter().cloned() {
            items.push(self.describe_with(booking, &mut communities).await?);
        }
        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
        })
    }

    async fn describe_with(
        &self,
        booking: Booking,
        communities: &mut HashMap<i64, Community>,
    ) -> DomainResult<BookingDetails> {
        let resident = self
            .repos
            .residents()
            .find_by_id(booking.resident_id)
            .await?
            .ok_or(DomainError::ResidentNotFound(booking.resident_id))?;
        let spot = self
            .repos
            .parking_spots()
            .find_by_id(booking.spot_id)
            .await?
            .ok_or(DomainError::SpotNotFound(booking.spot_id))?;

        let community = match communities.get(&spot.community_id) {
            Some(c) => c.clone(),
            None => {
                let c = self
                    .repos
                    .communities()
                    .find_by_id(spot.community_id)
                    .await?
                    .ok_or(DomainError::CommunityNotFound(spot.community_id))?;
                communities.insert(c.id, c.clone());
                c
            }
        };

        Ok(BookingDetails {
            booking,
            resident,
            spot,
            community,
        })
    }

    async fn reconciled(&self, booking: Booking, now: DateTime<Utc>) -> DomainResult<Booking> {
        let previous = booking.status;
        let current = reconcile(booking, now);
        if current.status == previous {
            return Ok(current);
        }

        debug!(
            booking_id = current.id,
            from = %previous,
            to = %current.status,
            "Reconciling expired booking"
        );
        match self.repos.bookings().update(&current, previous).await {
            Ok(()) => Ok(current),
            // Someone else moved it first; report what is stored now.
            Err(DomainError::ConcurrentModification(id)) => {
                let stored = self
                    .repos
                    .bookings()
                    .find_by_id(id)
                    .await?
                    .ok_or(DomainError::BookingNotFound(id))?;
                Ok(reconcile(stored, now))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::fixtures::{at, world, World};
    use crate::application::booking::BookingLifecycle;
    use crate::domain::BookingStatus;

    fn services(w: &World) -> (BookingLifecycle, BookingQueryService) {
        (
            BookingLifecycle::new(w.repos.clone(), w.clock.clone()),
            BookingQueryService::new(w.repos.clone(), w.clock.clone()),
        )
    }

    #[tokio::test]
    async fn current_listing_reconciles_expired_reservations() {
        let w = world().await;
        let (engine, queries) = services(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();

        w.clock.set(at(11, 0));
        let page = queries
            .list_by_resident(w.resident.id, BookingPeriod::Current, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, b.id);
        assert_eq!(page.items[0].status, BookingStatus::Reserved);

        w.clock.set(at(13, 0));
        let all = queries
            .list_by_resident(w.resident.id, BookingPeriod::All, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.items[0].status, BookingStatus::Cancelled);
        let stored = w.repos.bookings().find_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn past_listing_returns_completed_bookings() {
        let w = world().await;
        let (engine, queries) = services(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();
        w.clock.set(at(10, 30));
        engine.park(b.id).await.unwrap();
        w.clock.set(at(11, 45));
        engine.release(b.id).await.unwrap();

        w.clock.set(at(13, 0));
        let page = queries
            .list_by_resident(w.resident.id, BookingPeriod::Past, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.items[0].status, BookingStatus::Completed);
        assert_eq!(page.items[0].actual_end, Some(at(11, 45)));
    }

    #[tokio::test]
    async fn active_booking_past_its_window_reads_as_completed() {
        let w = world().await;
        let (engine, queries) = services(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();
        w.clock.set(at(10, 30));
        engine.park(b.id).await.unwrap();

        w.clock.set(at(14, 0));
        let read = queries.get(b.id).await.unwrap();
        assert_eq!(read.status, BookingStatus::Completed);
        assert!(read.actual_end.is_none());
    }

    #[tokio::test]
    async fn future_and_cancelled_periods() {
        let w = world().await;
        let (engine, queries) = services(&w);
        let later = engine
            .create(w.resident.id, w.spot.id, at(15, 0), at(16, 0))
            .await
            .unwrap();
        let dropped = engine
            .create(w.resident.id, w.spot.id, at(17, 0), at(18, 0))
            .await
            .unwrap();
        engine.cancel(dropped.id).await.unwrap();

        let future = queries
            .list_by_resident(w.resident.id, BookingPeriod::Future, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(future.items.iter().map(|b| b.id).collect::<Vec<_>>(), vec![later.id]);

        let cancelled = queries
            .list_by_resident(w.resident.id, BookingPeriod::Cancelled, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(
            cancelled.items.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![dropped.id]
        );
    }

    #[tokio::test]
    async fn pagination_metadata_and_unknown_resident() {
        let w = world().await;
        let (engine, queries) = services(&w);
        for h in [1, 3, 5] {
            engine
                .create(w.resident.id, w.spot.id, at(h + 12, 0), at(h + 13, 0))
                .await
                .unwrap();
        }

        let page = queries
            .list_by_resident(w.resident.id, BookingPeriod::All, PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].start, at(13, 0));
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_elements, 3);

        let err = queries
            .list_by_resident(999, BookingPeriod::All, PageRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ResidentNotFound(999)));
    }

    #[tokio::test]
    async fn describe_resolves_the_booking_graph() {
        let w = world().await;
        let (engine, queries) = services(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();

        let details = queries.describe(b.clone()).await.unwrap();
        assert_eq!(details.booking, b);
        assert_eq!(details.resident, w.resident);
        assert_eq!(details.spot, w.spot);
        assert_eq!(details.community.name, "Maple Court");

        assert!(matches!(
            queries.get(777).await.unwrap_err(),
            DomainError::BookingNotFound(777)
        ));
    }
}
