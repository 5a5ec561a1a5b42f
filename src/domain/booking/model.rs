//! Booking domain entity
//!
//! Holds every rule of the booking state machine: the window check shared
//! by park/release, the explicit transitions, and the lazy reconciliation
//! applied on reads.

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Spot is held for the requested window
    Reserved,
    /// Resident has parked
    Active,
    /// Resident released the spot (or the window lapsed while parked)
    Completed,
    /// Cancelled explicitly or by expiry before parking
    Cancelled,
}

impl BookingStatus {
    /// Statuses that hold a spot for their window.
    pub const HOLDING: [BookingStatus; 2] = [BookingStatus::Reserved, BookingStatus::Active];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "RESERVED",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn holds_spot(&self) -> bool {
        Self::HOLDING.contains(self)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of an instant relative to a booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    Before,
    Within,
    After,
}

/// Half-open overlap test: `[s1, e1)` and `[s2, e2)` intersect iff
/// `s1 < e2 && s2 < e1`. Touching intervals do not overlap.
pub fn intervals_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}

/// Validated request for a new booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub resident_id: i64,
    pub spot_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl NewBooking {
    pub fn new(
        resident_id: i64,
        spot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidPeriod(
                "Start time cannot equal or come after end time".to_string(),
            ));
        }
        Ok(Self {
            resident_id,
            spot_id,
            start,
            end,
        })
    }

    /// Materialize with the store-assigned id.
    pub fn into_booking(self, id: i64) -> Booking {
        Booking {
            id,
            resident_id: self.resident_id,
            spot_id: self.spot_id,
            start: self.start,
            end: self.end,
            status: BookingStatus::Reserved,
            actual_start: None,
            actual_end: None,
        }
    }
}

/// Time-bounded booking of a parking spot by a resident
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    pub resident_id: i64,
    pub spot_id: i64,
    /// Requested start (inclusive)
    pub start: DateTime<Utc>,
    /// Requested end (exclusive)
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    /// Set when parked
    pub actual_start: Option<DateTime<Utc>>,
    /// Set when released
    pub actual_end: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        intervals_overlap(self.start, self.end, start, end)
    }

    pub fn window_position(&self, now: DateTime<Utc>) -> WindowPosition {
        if now < self.start {
            WindowPosition::Before
        } else if now > self.end {
            WindowPosition::After
        } else {
            WindowPosition::Within
        }
    }

    /// Window rule shared by park and release. An expired booking is
    /// cancelled in place; the caller persists that before surfacing the error.
    fn enter_window(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.window_position(now) {
            WindowPosition::Before => Err(DomainError::BookingNotStarted(self.id)),
            WindowPosition::After => {
                self.status = BookingStatus::Cancelled;
                Err(DomainError::BookingExpired(self.id))
            }
            WindowPosition::Within => Ok(()),
        }
    }

    /// RESERVED → ACTIVE
    pub fn park(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != BookingStatus::Reserved {
            return Err(DomainError::BookingNotReserved {
                id: self.id,
                status: self.status,
            });
        }
        self.enter_window(now)?;
        self.status = BookingStatus::Active;
        self.actual_start = Some(now);
        Ok(())
    }

    /// ACTIVE → COMPLETED
    pub fn release(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != BookingStatus::Active {
            return Err(DomainError::BookingNotActive {
                id: self.id,
                status: self.status,
            });
        }
        self.enter_window(now)?;
        self.status = BookingStatus::Completed;
        self.actual_end = Some(now);
        Ok(())
    }

    /// RESERVED → CANCELLED, independent of time
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        match self.status {
            BookingStatus::Cancelled => Err(DomainError::BookingEnded(self.id)),
            BookingStatus::Reserved => {
                self.status = BookingStatus::Cancelled;
                Ok(())
            }
            status => Err(DomainError::BookingNotReserved {
                id: self.id,
                status,
            }),
        }
    }
}

/// Lazy expiration applied on reads.
///
/// Once `now` is past the window a RESERVED booking becomes CANCELLED and an
/// ACTIVE one becomes COMPLETED. Terminal bookings are returned untouched.
pub fn reconcile(mut booking: Booking, now: DateTime<Utc>) -> Booking {
    if booking.status.is_terminal() || now <= booking.end {
        return booking;
    }
    booking.status = match booking.status {
        BookingStatus::Reserved => BookingStatus::Cancelled,
        BookingStatus::Active => BookingStatus::Completed,
        other => other,
    };
    booking
}

// ── Tests ──────────────────────────────────────────────────────
