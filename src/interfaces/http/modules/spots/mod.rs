//! Parking spot module: spots and derived availability

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
