//! Parking spot handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{AvailableSpotsParams, CreateParkingSpotRequest, ListSpotsParams, ParkingSpotDto};
use crate::application::ParkingSpotService;
use crate::interfaces::http::common::{
    ApiQuery, ApiResponse, ApiResult, PageLimits, PageParams, PaginatedResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct SpotHandlerState {
    pub service: Arc<ParkingSpotService>,
    pub limits: PageLimits,
}

#[utoipa::path(
    post,
    path = "/api/v1/spots",
    tag = "Parking Spots",
    request_body = CreateParkingSpotRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ParkingSpotDto>),
        (status = 404, description = "Community not found"),
        (status = 409, description = "Code already used in the community"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_spot(
    State(state): State<SpotHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateParkingSpotRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ParkingSpotDto>>)> {
    let spot = state
        .service
        .create(&request.code, request.community_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(spot.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/spots/{id}",
    tag = "Parking Spots",
    params(("id" = i64, Path, description = "Parking spot ID")),
    responses(
        (status = 200, description = "Parking spot details", body = ApiResponse<ParkingSpotDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_spot(
    State(state): State<SpotHandlerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<ParkingSpotDto>>> {
    let spot = state.service.get(id).await?;
    Ok(Json(ApiResponse::success(spot.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/communities/{id}/spots",
    tag = "Parking Spots",
    params(
        ("id" = i64, Path, description = "Community ID"),
        ListSpotsParams
    ),
    responses(
        (status = 200, description = "Spots of the community", body = PaginatedResponse<ParkingSpotDto>),
        (status = 404, description = "Community not found")
    )
)]
pub async fn list_community_spots(
    State(state): State<SpotHandlerState>,
    Path(community_id): Path<i64>,
    ApiQuery(params): ApiQuery<ListSpotsParams>,
) -> ApiResult<Json<PaginatedResponse<ParkingSpotDto>>> {
    let page = state.limits.request(&PageParams {
        page: params.page,
        size: params.size,
    });
    let found = state
        .service
        .list_by_community(community_id, params.code.as_deref(), page)
        .await?;
    Ok(Json(found.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/communities/{id}/spots/available",
    tag = "Parking Spots",
    params(
        ("id" = i64, Path, description = "Community ID"),
        AvailableSpotsParams
    ),
    responses(
        (status = 200, description = "Spots free for the whole window", body = PaginatedResponse<ParkingSpotDto>),
        (status = 400, description = "Invalid period"),
        (status = 404, description = "Community not found")
    )
)]
pub async fn list_available_spots(
    State(state): State<SpotHandlerState>,
    Path(community_id): Path<i64>,
    ApiQuery(params): ApiQuery<AvailableSpotsParams>,
) -> ApiResult<Json<PaginatedResponse<ParkingSpotDto>>> {
    let page = state.limits.request(&PageParams {
        page: params.page,
        size: params.size,
    });
    let found = state
        .service
        .list_available(
            community_id,
            params.start,
            params.end,
            params.code.as_deref(),
            page,
        )
        .await?;
    Ok(Json(found.into()))
}
