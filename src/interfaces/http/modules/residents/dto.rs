//! Resident DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Resident;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResidentDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub community_id: i64,
}

impl From<Resident> for ResidentDto {
    fn from(r: Resident) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            community_id: r.community_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResidentRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 1))]
    pub community_id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListResidentsParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}
