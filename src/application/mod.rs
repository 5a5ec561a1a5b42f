//! Application layer - use-case orchestration over the domain
//!
//! Services hold an `Arc<dyn RepositoryProvider>` and stay unaware of the
//! concrete store; HTTP handlers are thin wrappers around them.

pub mod booking;
pub mod services;

pub use booking::{BookingDetails, BookingLifecycle, BookingQueryService, OverlapChecker};
pub use services::{CommunityService, ParkingSpotService, ResidentService};
