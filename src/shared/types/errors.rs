use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::booking::BookingStatus;

/// Coarse classification of a [`DomainError`], used by transports to pick
/// a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Gone,
    BadRequest,
    Internal,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid booking period: {0}")]
    InvalidPeriod(String),

    #[error("Resident with the following id not found: {0}")]
    ResidentNotFound(i64),

    #[error("Parking spot with the following id not found: {0}")]
    SpotNotFound(i64),

    #[error("Community with the following id not found: {0}")]
    CommunityNotFound(i64),

    #[error("Booking with the following id not found: {0}")]
    BookingNotFound(i64),

    #[error("Resident {resident_id} is not part of community {community_id}")]
    CommunityMismatch { resident_id: i64, community_id: i64 },

    #[error("Parking spot {spot_id} is already booked between {start} and {end}")]
    SlotAlreadyBooked {
        spot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Booking {id} is not reserved (status: {status})")]
    BookingNotReserved { id: i64, status: BookingStatus },

    #[error("Booking {id} is not active (status: {status})")]
    BookingNotActive { id: i64, status: BookingStatus },

    #[error("Booking {0} cannot be accessed, as the period did not start yet")]
    BookingNotStarted(i64),

    #[error("Booking {0} cannot be accessed, as the period has ended")]
    BookingExpired(i64),

    #[error("Booking {0} is already cancelled")]
    BookingEnded(i64),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Booking {0} was modified concurrently")]
    ConcurrentModification(i64),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ResidentNotFound(_)
            | Self::SpotNotFound(_)
            | Self::CommunityNotFound(_)
            | Self::BookingNotFound(_) => ErrorKind::NotFound,
            Self::CommunityMismatch { .. }
            | Self::SlotAlreadyBooked { .. }
            | Self::BookingNotReserved { .. }
            | Self::BookingNotActive { .. }
            | Self::BookingNotStarted(_)
            | Self::AlreadyExists(_)
            | Self::ConcurrentModification(_) => ErrorKind::Conflict,
            Self::BookingExpired(_) | Self::BookingEnded(_) => ErrorKind::Gone,
            Self::InvalidPeriod(_) | Self::Validation(_) => ErrorKind::BadRequest,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        InfraError::Database(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_classify_as_not_found() {
        assert_eq!(DomainError::BookingNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::ResidentNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::SpotNotFound(1).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn expiry_is_gone_and_not_started_is_conflict() {
        assert_eq!(DomainError::BookingExpired(7).kind(), ErrorKind::Gone);
        assert_eq!(DomainError::BookingEnded(7).kind(), ErrorKind::Gone);
        assert_eq!(DomainError::BookingNotStarted(7).kind(), ErrorKind::Conflict);
    }

    #[test]
    fn db_errors_become_internal_storage_errors() {
        let err: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn messages_are_human_readable() {
        let err = DomainError::BookingNotReserved {
            id: 3,
            status: BookingStatus::Active,
        };
        assert_eq!(err.to_string(), "Booking 3 is not reserved (status: ACTIVE)");
    }
}
