//! # Residential Parking Service
//!
//! Booking of parking spots inside residential communities. Residents
//! reserve a spot for a time window, park inside it, release it, or
//! cancel beforehand. Stale bookings are reconciled lazily on access.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: entities, the booking state machine and repository traits
//! - **application**: booking lifecycle, queries and directory services
//! - **infrastructure**: SeaORM persistence and the in-memory store
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: clock, errors, pagination and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryStorage, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_api_router, AppServices};
