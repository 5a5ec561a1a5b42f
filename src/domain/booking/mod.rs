//! Booking aggregate
//!
//! Contains the Booking entity, its state machine, period filters and the
//! repository interface.

pub mod model;
pub mod period;
pub mod repository;

pub use model::{intervals_overlap, reconcile, Booking, BookingStatus, NewBooking, WindowPosition};
pub use period::{BookingFilter, BookingPeriod};
pub use repository::BookingRepository;
