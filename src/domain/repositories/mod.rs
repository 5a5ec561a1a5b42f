//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::booking::BookingRepository;
use super::community::CommunityRepository;
use super::parking_spot::ParkingSpotRepository;
use super::resident::ResidentRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let resident = repos.residents().find_by_id(1).await?;
///     let clash = repos.bookings().exists_overlapping(10, start, end).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn communities(&self) -> &dyn CommunityRepository;
    fn residents(&self) -> &dyn ResidentRepository;
    fn parking_spots(&self) -> &dyn ParkingSpotRepository;
    fn bookings(&self) -> &dyn BookingRepository;
}
