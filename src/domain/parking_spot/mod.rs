//! Parking spot aggregate
//!
//! Spots carry no status of their own: availability is always derived
//! from the bookings that hold them.

pub mod model;
pub mod repository;

pub use model::{NewParkingSpot, ParkingSpot};
pub use repository::ParkingSpotRepository;
