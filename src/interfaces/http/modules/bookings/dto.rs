//! Booking DTOs
//!
//! Responses are one-way projections of the booking graph:
//! booking → resident → community and booking → spot → community.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::BookingDetails;
use crate::domain::{BookingPeriod, Community};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommunitySummary {
    pub id: i64,
    pub name: String,
}

impl From<&Community> for CommunitySummary {
    fn from(c: &Community) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResidentSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub community: CommunitySummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpotSummary {
    pub id: i64,
    pub code: String,
    pub community: CommunitySummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i64,
    /// RESERVED, ACTIVE, COMPLETED or CANCELLED
    pub status: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub resident: ResidentSummary,
    pub parking_spot: SpotSummary,
}

impl From<BookingDetails> for BookingDto {
    fn from(d: BookingDetails) -> Self {
        let community = CommunitySummary::from(&d.community);
        Self {
            id: d.booking.id,
            status: d.booking.status.to_string(),
            start: d.booking.start,
            end: d.booking.end,
            actual_start: d.booking.actual_start,
            actual_end: d.booking.actual_end,
            resident: ResidentSummary {
                id: d.resident.id,
                first_name: d.resident.first_name,
                last_name: d.resident.last_name,
                email: d.resident.email,
                community: community.clone(),
            },
            parking_spot: SpotSummary {
                id: d.spot.id,
                code: d.spot.code,
                community,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1))]
    pub resident_id: i64,
    #[validate(range(min = 1))]
    pub spot_id: i64,
    /// Requested start (RFC 3339)
    pub start: DateTime<Utc>,
    /// Requested end (RFC 3339), exclusive
    pub end: DateTime<Utc>,
}

/// Time-relative booking filter
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PeriodParam {
    /// Completed bookings whose window has ended
    #[serde(alias = "past")]
    Past,
    /// Reserved or active bookings whose window contains now
    #[default]
    #[serde(alias = "current")]
    Current,
    /// Reserved bookings that have not started
    #[serde(alias = "future")]
    Future,
    #[serde(alias = "cancelled")]
    Cancelled,
    #[serde(alias = "all")]
    All,
}

impl From<PeriodParam> for BookingPeriod {
    fn from(p: PeriodParam) -> Self {
        match p {
            PeriodParam::Past => Self::Past,
            PeriodParam::Current => Self::Current,
            PeriodParam::Future => Self::Future,
            PeriodParam::Cancelled => Self::Cancelled,
            PeriodParam::All => Self::All,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBookingsParams {
    /// Defaults to CURRENT
    #[serde(default)]
    pub period: PeriodParam,
    pub page: Option<u64>,
    pub size: Option<u64>,
}
