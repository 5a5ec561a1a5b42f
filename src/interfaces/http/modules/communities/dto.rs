//! Community DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Community;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommunityDto {
    pub id: i64,
    pub name: String,
}

impl From<Community> for CommunityDto {
    fn from(c: Community) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommunityRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCommunitiesParams {
    /// Case-insensitive name fragment
    pub name: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}
