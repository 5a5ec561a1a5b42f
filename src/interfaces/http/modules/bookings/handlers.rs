//! Booking handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{BookingDto, CreateBookingRequest, ListBookingsParams};
use crate::application::{BookingLifecycle, BookingQueryService};
use crate::domain::Booking;
use crate::interfaces::http::common::{
    ApiQuery, ApiResponse, ApiResult, PageLimits, PageParams, PaginatedResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct BookingHandlerState {
    pub lifecycle: Arc<BookingLifecycle>,
    pub queries: Arc<BookingQueryService>,
    pub limits: PageLimits,
}

impl BookingHandlerState {
    async fn render(&self, booking: Booking) -> ApiResult<Json<ApiResponse<BookingDto>>> {
        let details = self.queries.describe(booking).await?;
        Ok(Json(ApiResponse::success(details.into())))
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking reserved", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid period"),
        (status = 404, description = "Resident or spot not found"),
        (status = 409, description = "Slot already booked or community mismatch"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_booking(
    State(state): State<BookingHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .lifecycle
        .create(
            request.resident_id,
            request.spot_id,
            request.start,
            request.end,
        )
        .await?;
    Ok((StatusCode::CREATED, state.render(booking).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<BookingDto>>> {
    let booking = state.queries.get(id).await?;
    state.render(booking).await
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/park",
    tag = "Bookings",
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Parked", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Not reserved or window not started"),
        (status = 410, description = "Window ended; booking cancelled")
    )
)]
pub async fn park_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<BookingDto>>> {
    let booking = state.lifecycle.park(id).await?;
    state.render(booking).await
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/release",
    tag = "Bookings",
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Released", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Not active or window not started"),
        (status = 410, description = "Window ended; booking cancelled")
    )
)]
pub async fn release_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<BookingDto>>> {
    let booking = state.lifecycle.release(id).await?;
    state.render(booking).await
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    params(("id" = i64, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Cancelled", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Not reserved"),
        (status = 410, description = "Already cancelled")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<BookingDto>>> {
    let booking = state.lifecycle.cancel(id).await?;
    state.render(booking).await
}

#[utoipa::path(
    get,
    path = "/api/v1/residents/{id}/bookings",
    tag = "Bookings",
    params(
        ("id" = i64, Path, description = "Resident ID"),
        ListBookingsParams
    ),
    responses(
        (status = 200, description = "Bookings of the resident, newest first", body = PaginatedResponse<BookingDto>),
        (status = 404, description = "Resident not found")
    )
)]
pub async fn list_resident_bookings(
    State(state): State<BookingHandlerState>,
    Path(resident_id): Path<i64>,
    ApiQuery(params): ApiQuery<ListBookingsParams>,
) -> ApiResult<Json<PaginatedResponse<BookingDto>>> {
    let page = state.limits.request(&PageParams {
        page: params.page,
        size: params.size,
    });
    let found = state
        .queries
        .list_by_resident(resident_id, params.period.into(), page)
        .await?;
    let described = state.queries.describe_page(found).await?;
    Ok(Json(described.into()))
}
