//! Booking module: reservation lifecycle and resident booking history

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
