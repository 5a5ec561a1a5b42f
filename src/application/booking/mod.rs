//! Booking use-cases
//!
//! - [`OverlapChecker`] answers "is this spot held during that window?"
//! - [`BookingLifecycle`] drives create / park / release / cancel
//! - [`BookingQueryService`] serves reads and reconciles expired bookings

pub mod lifecycle;
pub mod overlap;
pub mod queries;

pub use lifecycle::BookingLifecycle;
pub use overlap::OverlapChecker;
pub use queries::{BookingDetails, BookingQueryService};
