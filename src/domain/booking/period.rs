//! Time-relative booking filters

use chrono::{DateTime, Utc};

use super::model::{Booking, BookingStatus};

/// Named filter for a resident's bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingPeriod {
    Past,
    #[default]
    Current,
    Future,
    Cancelled,
    All,
}

/// Store-level predicate a [`BookingPeriod`] resolves to at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingFilter {
    /// `status == status && end < before`
    EndedBefore {
        status: BookingStatus,
        before: DateTime<Utc>,
    },
    /// `status ∈ statuses && start <= at <= end`
    Spanning {
        statuses: Vec<BookingStatus>,
        at: DateTime<Utc>,
    },
    /// `status == status && start > after`
    StartsAfter {
        status: BookingStatus,
        after: DateTime<Utc>,
    },
    /// `status == status`
    Status(BookingStatus),
    Any,
}

impl BookingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "PAST",
            Self::Current => "CURRENT",
            Self::Future => "FUTURE",
            Self::Cancelled => "CANCELLED",
            Self::All => "ALL",
        }
    }

    pub fn filter(self, now: DateTime<Utc>) -> BookingFilter {
        match self {
            Self::Past => BookingFilter::EndedBefore {
                status: BookingStatus::Completed,
                before: now,
            },
            Self::Current => BookingFilter::Spanning {
                statuses: BookingStatus::HOLDING.to_vec(),
                at: now,
            },
            Self::Future => BookingFilter::StartsAfter {
                status: BookingStatus::Reserved,
                after: now,
            },
            Self::Cancelled => BookingFilter::Status(BookingStatus::Cancelled),
            Self::All => BookingFilter::Any,
        }
    }
}

impl BookingFilter {
    pub fn matches(&self, b: &Booking) -> bool {
        match self {
            Self::EndedBefore { status, before } => b.status == *status && b.end < *before,
            Self::Spanning { statuses, at } => {
                statuses.contains(&b.status) && b.start <= *at && *at <= b.end
            }
            Self::StartsAfter { status, after } => b.status == *status && b.start > *after,
            Self::Status(status) => b.status == *status,
            Self::Any => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::NewBooking;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, h, 0, 0).unwrap()
    }

    fn booking(status: BookingStatus) -> Booking {
        let mut b = NewBooking::new(1, 10, at(10), at(12))
            .unwrap()
            .into_booking(1);
        b.status = status;
        b
    }

    #[test]
    fn current_includes_window_bounds() {
        let b = booking(BookingStatus::Reserved);
        assert!(BookingPeriod::Current.filter(at(10)).matches(&b));
        assert!(BookingPeriod::Current.filter(at(11)).matches(&b));
        assert!(BookingPeriod::Current.filter(at(12)).matches(&b));
        assert!(!BookingPeriod::Current.filter(at(13)).matches(&b));
        assert!(!BookingPeriod::Current
            .filter(at(11))
            .matches(&booking(BookingStatus::Cancelled)));
    }

    #[test]
    fn past_requires_completed_and_finished() {
        let done = booking(BookingStatus::Completed);
        assert!(BookingPeriod::Past.filter(at(13)).matches(&done));
        assert!(!BookingPeriod::Past.filter(at(12)).matches(&done));
        assert!(!BookingPeriod::Past
            .filter(at(13))
            .matches(&booking(BookingStatus::Reserved)));
    }

    #[test]
    fn future_requires_reserved_and_not_started() {
        let b = booking(BookingStatus::Reserved);
        assert!(BookingPeriod::Future.filter(at(9)).matches(&b));
        assert!(!BookingPeriod::Future.filter(at(10)).matches(&b));
        assert!(!BookingPeriod::Future
            .filter(at(9))
            .matches(&booking(BookingStatus::Active)));
    }

    #[test]
    fn cancelled_and_all() {
        assert!(BookingPeriod::Cancelled
            .filter(at(0))
            .matches(&booking(BookingStatus::Cancelled)));
        assert!(BookingPeriod::All
            .filter(at(0))
            .matches(&booking(BookingStatus::Active)));
    }
}
