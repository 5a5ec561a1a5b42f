//! Resident aggregate

pub mod model;
pub mod repository;

pub use model::{NewResident, Resident, ResidentCriteria};
pub use repository::ResidentRepository;
