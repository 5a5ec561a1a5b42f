pub mod bookings;
pub mod communities;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod residents;
pub mod spots;
