//! Database entities module

pub mod booking;
pub mod community;
pub mod parking_spot;
pub mod resident;

pub use booking::Entity as Booking;
pub use community::Entity as Community;
pub use parking_spot::Entity as ParkingSpot;
pub use resident::Entity as Resident;
