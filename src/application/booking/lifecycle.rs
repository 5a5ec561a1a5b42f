//! Booking state machine driver
//!
//! Loads the booking, applies the transition rule from the domain model,
//! and persists the result as a compare-and-set on the previous status.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::overlap::OverlapChecker;
use crate::domain::booking::{Booking, NewBooking};
use crate::domain::{DomainError, DomainResult, ErrorKind, RepositoryProvider};
use crate::shared::SharedClock;

fn record_transition(transition: &'static str, outcome: &DomainResult<Booking>) {
    let outcome = match outcome {
        Ok(_) => "ok",
        Err(e) => match e.kind() {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Gone => "gone",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Internal => "error",
        },
    };
    metrics::counter!("bookings_transitions_total", "transition" => transition, "outcome" => outcome)
        .increment(1);
}

pub struct BookingLifecycle {
    repos: Arc<dyn RepositoryProvider>,
    overlap: OverlapChecker,
    clock: SharedClock,
}

impl BookingLifecycle {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self {
            overlap: OverlapChecker::new(repos.clone()),
            repos,
            clock,
        }
    }

    /// Reserve `spot_id` for `resident_id` over `[start, end)`.
    pub async fn create(
        &self,
        resident_id: i64,
        spot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Booking> {
        let outcome = self.try_create(resident_id, spot_id, start, end).await;
        record_transition("create", &outcome);
        outcome
    }

    async fn try_create(
        &self,
        resident_id: i64,
        spot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Booking> {
        let request = NewBooking::new(resident_id, spot_id, start, end)?;

        let resident = self
            .repos
            .residents()
            .find_by_id(resident_id)
            .await?
            .ok_or(DomainError::ResidentNotFound(resident_id))?;
        let spot = self
            .repos
            .parking_spots()
            .find_by_id(spot_id)
            .await?
            .ok_or(DomainError::SpotNotFound(spot_id))?;

        if resident.community_id != spot.community_id {
            return Err(DomainError::CommunityMismatch {
                resident_id,
                community_id: spot.community_id,
            });
        }

        let taken = || DomainError::SlotAlreadyBooked {
            spot_id,
            start,
            end,
        };
        if self.overlap.exists(spot_id, start, end).await? {
            return Err(taken());
        }

        let booking = self
            .repos
            .bookings()
            .insert_if_free(request)
            .await?
            .ok_or_else(taken)?;

        info!(
            booking_id = booking.id,
            resident_id,
            spot_id,
            %start,
            %end,
            "Booking reserved"
        );
        Ok(booking)
    }

    /// RESERVED → ACTIVE at the current time.
    pub async fn park(&self, id: i64) -> DomainResult<Booking> {
        self.transition("park", id, |b, now| b.park(now)).await
    }

    /// ACTIVE → COMPLETED at the current time.
    pub async fn release(&self, id: i64) -> DomainResult<Booking> {
        self.transition("release", id, |b, now| b.release(now)).await
    }

    /// RESERVED → CANCELLED.
    pub async fn cancel(&self, id: i64) -> DomainResult<Booking> {
        self.transition("cancel", id, |b, _| b.cancel()).await
    }

    async fn transition<F>(&self, name: &'static str, id: i64, apply: F) -> DomainResult<Booking>
    where
        F: FnOnce(&mut Booking, DateTime<Utc>) -> DomainResult<()> + Send,
    {
        let outcome = self.try_transition(id, apply).await;
        record_transition(name, &outcome);
        match &outcome {
            Ok(b) => info!(booking_id = id, status = %b.status, "Booking {}", name),
            Err(DomainError::BookingExpired(_)) => {
                info!(booking_id = id, "Booking expired on {}, cancelled", name)
            }
            Err(e) if e.kind() == ErrorKind::Internal => {
                warn!(booking_id = id, error = %e, "Booking {} failed", name)
            }
            Err(_) => {}
        }
        outcome
    }

    async fn try_transition<F>(&self, id: i64, apply: F) -> DomainResult<Booking>
    where
        F: FnOnce(&mut Booking, DateTime<Utc>) -> DomainResult<()> + Send,
    {
        let bookings = self.repos.bookings();
        let mut booking = bookings
            .find_by_id(id)
            .await?
            .ok_or(DomainError::BookingNotFound(id))?;

        let previous = booking.status;
        let result = apply(&mut booking, self.clock.now());

        // Expiry mutates the booking even on failure; persist before reporting.
        if booking.status != previous {
            bookings.update(&booking, previous).await?;
        }
        result.map(|_| booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::fixtures::{at, world, World};
    use crate::domain::BookingStatus;

    fn engine(w: &World) -> BookingLifecycle {
        BookingLifecycle::new(w.repos.clone(), w.clock.clone())
    }

    async fn stored(w: &World, id: i64) -> Booking {
        w.repos.bookings().find_by_id(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn reserve_park_release_happy_path() {
        let w = world().await;
        let engine = engine(&w);

        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();
        assert_eq!(b.status, BookingStatus::Reserved);
        assert!(b.actual_start.is_none() && b.actual_end.is_none());

        w.clock.set(at(10, 30));
        let parked = engine.park(b.id).await.unwrap();
        assert_eq!(parked.status, BookingStatus::Active);
        assert_eq!(parked.actual_start, Some(at(10, 30)));

        w.clock.set(at(11, 45));
        let done = engine.release(b.id).await.unwrap();
        assert_eq!(done.status, BookingStatus::Completed);
        assert_eq!(done.actual_end, Some(at(11, 45)));
        assert_eq!(stored(&w, b.id).await, done);
    }

    #[tokio::test]
    async fn create_validates_period_and_references() {
        let w = world().await;
        let engine = engine(&w);

        let err = engine
            .create(w.resident.id, w.spot.id, at(12, 0), at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPeriod(_)));

        let err = engine
            .create(999, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ResidentNotFound(999)));

        let err = engine
            .create(w.resident.id, 999, at(10, 0), at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SpotNotFound(999)));

        let err = engine
            .create(w.resident.id, w.foreign_spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CommunityMismatch { .. }));
    }

    #[tokio::test]
    async fn overlapping_reservations_are_rejected() {
        let w = world().await;
        let engine = engine(&w);
        engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();

        let err = engine
            .create(w.resident.id, w.spot.id, at(11, 0), at(13, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::SlotAlreadyBooked { spot_id, .. } if spot_id == w.spot.id
        ));

        let back_to_back = engine
            .create(w.resident.id, w.spot.id, at(12, 0), at(13, 0))
            .await
            .unwrap();
        assert_eq!(back_to_back.status, BookingStatus::Reserved);
    }

    #[tokio::test]
    async fn park_before_start_is_rejected_without_side_effects() {
        let w = world().await;
        let engine = engine(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();

        let err = engine.park(b.id).await.unwrap_err();
        assert!(matches!(err, DomainError::BookingNotStarted(id) if id == b.id));
        assert_eq!(stored(&w, b.id).await.status, BookingStatus::Reserved);
    }

    #[tokio::test]
    async fn park_after_end_expires_and_persists_cancellation() {
        let w = world().await;
        let engine = engine(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();

        w.clock.set(at(12, 30));
        let err = engine.park(b.id).await.unwrap_err();
        assert!(matches!(err, DomainError::BookingExpired(_)));
        assert_eq!(stored(&w, b.id).await.status, BookingStatus::Cancelled);

        // The slot is free again
        engine
            .create(w.resident.id, w.spot.id, at(11, 0), at(13, 0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn release_after_end_cancels_active_booking() {
        let w = world().await;
        let engine = engine(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();
        w.clock.set(at(10, 15));
        engine.park(b.id).await.unwrap();

        w.clock.set(at(13, 0));
        let err = engine.release(b.id).await.unwrap_err();
        assert!(matches!(err, DomainError::BookingExpired(_)));
        let after = stored(&w, b.id).await;
        assert_eq!(after.status, BookingStatus::Cancelled);
        assert!(after.actual_end.is_none());
    }

    #[tokio::test]
    async fn state_errors_report_current_status() {
        let w = world().await;
        let engine = engine(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();

        let err = engine.release(b.id).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::BookingNotActive {
                status: BookingStatus::Reserved,
                ..
            }
        ));

        w.clock.set(at(10, 5));
        engine.park(b.id).await.unwrap();
        let err = engine.park(b.id).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::BookingNotReserved {
                status: BookingStatus::Active,
                ..
            }
        ));
        let err = engine.cancel(b.id).await.unwrap_err();
        assert!(matches!(err, DomainError::BookingNotReserved { .. }));
    }

    #[tokio::test]
    async fn cancel_is_time_independent_and_terminal() {
        let w = world().await;
        let engine = engine(&w);
        let b = engine
            .create(w.resident.id, w.spot.id, at(10, 0), at(12, 0))
            .await
            .unwrap();

        w.clock.set(at(20, 0));
        let cancelled = engine.cancel(b.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let err = engine.cancel(b.id).await.unwrap_err();
        assert!(matches!(err, DomainError::BookingEnded(_)));

        let err = engine.park(b.id).await.unwrap_err();
        assert!(matches!(err, DomainError::BookingNotReserved { .. }));
    }

    #[tokio::test]
    async fn unknown_booking_is_not_found() {
        let w = world().await;
        let engine = engine(&w);
        assert!(matches!(
            engine.park(42).await.unwrap_err(),
            DomainError::BookingNotFound(42)
        ));
        assert!(matches!(
            engine.release(42).await.unwrap_err(),
            DomainError::BookingNotFound(42)
        ));
        assert!(matches!(
            engine.cancel(42).await.unwrap_err(),
            DomainError::BookingNotFound(42)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_overlapping_creates_on_pooled_sqlite_admit_one() {
        use crate::domain::community::NewCommunity;
        use crate::domain::parking_spot::NewParkingSpot;
        use crate::domain::resident::NewResident;
        use crate::infrastructure::database::repositories::test_support::{
            file_db, remove_file_db,
        };
        use crate::infrastructure::SeaOrmRepositoryProvider;
        use crate::shared::FixedClock;

        let (db, path) = file_db(10).await;
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let community = repos
            .communities()
            .insert(NewCommunity::new("Maple Court").unwrap())
            .await
            .unwrap();
        let resident = repos
            .residents()
            .insert(NewResident::new("Ann", "Lee", "ann@example.com", community.id).unwrap())
            .await
            .unwrap();
        let spot = repos
            .parking_spots()
            .insert(NewParkingSpot::new("A-01", community.id).unwrap())
            .await
            .unwrap();

        let engine = Arc::new(BookingLifecycle::new(
            repos.clone(),
            Arc::new(FixedClock::new(at(9, 0))),
        ));
        let tasks: Vec<_> = (0..16u32)
            .map(|i| {
                let engine = engine.clone();
                tokio::spawn(async move {
                    engine
                        .create(resident.id, spot.id, at(10, i), at(12, 0))
                        .await
                })
            })
            .collect();

        let mut won = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => won += 1,
                Err(DomainError::SlotAlreadyBooked { spot_id, .. }) => assert_eq!(spot_id, spot.id),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(won, 1);

        let all = repos
            .bookings()
            .find_by_resident(
                resident.id,
                &crate::domain::booking::BookingFilter::Any,
                crate::shared::pagination::PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(all.total_elements, 1);

        remove_file_db(db, path).await;
    }
}
