//! Directory services: communities, residents and parking spots

pub mod community;
pub mod parking_spot;
pub mod resident;

pub use community::CommunityService;
pub use parking_spot::ParkingSpotService;
pub use resident::ResidentService;
