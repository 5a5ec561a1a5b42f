//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::community::CommunityRepository;
use crate::domain::parking_spot::ParkingSpotRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::resident::ResidentRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::community_repository::SeaOrmCommunityRepository;
use super::parking_spot_repository::SeaOrmParkingSpotRepository;
use super::resident_repository::SeaOrmResidentRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let spot = repos.parking_spots().find_by_id(7).await?;
/// let held = repos.bookings().exists_overlapping(7, start, end).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    communities: SeaOrmCommunityRepository,
    residents: SeaOrmResidentRepository,
    parking_spots: SeaOrmParkingSpotRepository,
    bookings: SeaOrmBookingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            communities: SeaOrmCommunityRepository::new(db.clone()),
            residents: SeaOrmResidentRepository::new(db.clone()),
            parking_spots: SeaOrmParkingSpotRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn communities(&self) -> &dyn CommunityRepository {
        &self.communities
    }

    fn residents(&self) -> &dyn ResidentRepository {
        &self.residents
    }

    fn parking_spots(&self) -> &dyn ParkingSpotRepository {
        &self.parking_spots
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}
