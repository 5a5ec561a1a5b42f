//! Community handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CommunityDto, CreateCommunityRequest, ListCommunitiesParams};
use crate::application::CommunityService;
use crate::interfaces::http::common::{
    ApiQuery, ApiResponse, ApiResult, PageLimits, PageParams, PaginatedResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct CommunityHandlerState {
    pub service: Arc<CommunityService>,
    pub limits: PageLimits,
}

#[utoipa::path(
    get,
    path = "/api/v1/communities",
    tag = "Communities",
    params(ListCommunitiesParams),
    responses(
        (status = 200, description = "Community list", body = PaginatedResponse<CommunityDto>)
    )
)]
pub async fn list_communities(
    State(state): State<CommunityHandlerState>,
    ApiQuery(params): ApiQuery<ListCommunitiesParams>,
) -> ApiResult<Json<PaginatedResponse<CommunityDto>>> {
    let page = state.limits.request(&PageParams {
        page: params.page,
        size: params.size,
    });
    let found = state.service.list(params.name.as_deref(), page).await?;
    Ok(Json(found.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/communities",
    tag = "Communities",
    request_body = CreateCommunityRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<CommunityDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_community(
    State(state): State<CommunityHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateCommunityRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CommunityDto>>)> {
    let community = state.service.create(&request.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(community.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/communities/{id}",
    tag = "Communities",
    params(("id" = i64, Path, description = "Community ID")),
    responses(
        (status = 200, description = "Community details", body = ApiResponse<CommunityDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_community(
    State(state): State<CommunityHandlerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<CommunityDto>>> {
    let community = state.service.get(id).await?;
    Ok(Json(ApiResponse::success(community.into())))
}
