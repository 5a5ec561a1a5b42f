//! Resident handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateResidentRequest, ListResidentsParams, ResidentDto};
use crate::application::ResidentService;
use crate::domain::ResidentCriteria;
use crate::interfaces::http::common::{
    ApiQuery, ApiResponse, ApiResult, PageLimits, PageParams, PaginatedResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct ResidentHandlerState {
    pub service: Arc<ResidentService>,
    pub limits: PageLimits,
}

#[utoipa::path(
    post,
    path = "/api/v1/residents",
    tag = "Residents",
    request_body = CreateResidentRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ResidentDto>),
        (status = 404, description = "Community not found"),
        (status = 409, description = "Email already registered in the community"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_resident(
    State(state): State<ResidentHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateResidentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ResidentDto>>)> {
    let resident = state
        .service
        .create(
            &request.first_name,
            &request.last_name,
            &request.email,
            request.community_id,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(resident.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/residents/{id}",
    tag = "Residents",
    params(("id" = i64, Path, description = "Resident ID")),
    responses(
        (status = 200, description = "Resident details", body = ApiResponse<ResidentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_resident(
    State(state): State<ResidentHandlerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<ResidentDto>>> {
    let resident = state.service.get(id).await?;
    Ok(Json(ApiResponse::success(resident.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/communities/{id}/residents",
    tag = "Residents",
    params(
        ("id" = i64, Path, description = "Community ID"),
        ListResidentsParams
    ),
    responses(
        (status = 200, description = "Residents of the community", body = PaginatedResponse<ResidentDto>),
        (status = 404, description = "Community not found")
    )
)]
pub async fn list_community_residents(
    State(state): State<ResidentHandlerState>,
    Path(community_id): Path<i64>,
    ApiQuery(params): ApiQuery<ListResidentsParams>,
) -> ApiResult<Json<PaginatedResponse<ResidentDto>>> {
    let page = state.limits.request(&PageParams {
        page: params.page,
        size: params.size,
    });
    let criteria = ResidentCriteria {
        first_name: params.first_name,
        last_name: params.last_name,
    };
    let found = state
        .service
        .list_by_community(community_id, &criteria, page)
        .await?;
    Ok(Json(found.into()))
}
