//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingStatus;

/// Stored booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Status {
    #[sea_orm(string_value = "RESERVED")]
    Reserved,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl From<BookingStatus> for Status {
    fn from(s: BookingStatus) -> Self {
        match s {
            BookingStatus::Reserved => Self::Reserved,
            BookingStatus::Active => Self::Active,
            BookingStatus::Completed => Self::Completed,
            BookingStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for BookingStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::Reserved => Self::Reserved,
            Status::Active => Self::Active,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub resident_id: i64,
    pub spot_id: i64,

    /// Requested window, half-open `[start_time, end_time)`
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,

    pub status: Status,

    #[sea_orm(nullable)]
    pub actual_start_time: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub actual_end_time: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::resident::Entity",
        from = "Column::ResidentId",
        to = "super::resident::Column::Id"
    )]
    Resident,
    #[sea_orm(
        belongs_to = "super::parking_spot::Entity",
        from = "Column::SpotId",
        to = "super::parking_spot::Column::Id"
    )]
    ParkingSpot,
}

impl Related<super::resident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resident.def()
    }
}

impl Related<super::parking_spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
