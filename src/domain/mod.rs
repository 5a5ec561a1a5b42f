pub mod booking;
pub mod community;
pub mod parking_spot;
pub mod repositories;
pub mod resident;

// Re-export commonly used types
pub use booking::{Booking, BookingFilter, BookingPeriod, BookingRepository, BookingStatus, NewBooking};
pub use community::{Community, CommunityRepository, NewCommunity};
pub use parking_spot::{NewParkingSpot, ParkingSpot, ParkingSpotRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use resident::{NewResident, Resident, ResidentCriteria, ResidentRepository};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, ErrorKind};
