//! Parking spot DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::ParkingSpot;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParkingSpotDto {
    pub id: i64,
    pub code: String,
    pub community_id: i64,
}

impl From<ParkingSpot> for ParkingSpotDto {
    fn from(s: ParkingSpot) -> Self {
        Self {
            id: s.id,
            code: s.code,
            community_id: s.community_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParkingSpotRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(range(min = 1))]
    pub community_id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSpotsParams {
    /// Case-insensitive code fragment
    pub code: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableSpotsParams {
    /// Window start (RFC 3339)
    pub start: DateTime<Utc>,
    /// Window end (RFC 3339), exclusive
    pub end: DateTime<Utc>,
    pub code: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}
