//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, PageLimits, PaginatedResponse};
use super::modules::bookings::{self, BookingHandlerState};
use super::modules::communities::{self, CommunityHandlerState};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::residents::{self, ResidentHandlerState};
use super::modules::spots::{self, SpotHandlerState};
use crate::application::{
    BookingLifecycle, BookingQueryService, CommunityService, ParkingSpotService, ResidentService,
};
use crate::domain::RepositoryProvider;
use crate::shared::SharedClock;

/// Application services shared by all handlers.
#[derive(Clone)]
pub struct AppServices {
    pub lifecycle: Arc<BookingLifecycle>,
    pub bookings: Arc<BookingQueryService>,
    pub communities: Arc<CommunityService>,
    pub residents: Arc<ResidentService>,
    pub spots: Arc<ParkingSpotService>,
    pub limits: PageLimits,
}

impl AppServices {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock, limits: PageLimits) -> Self {
        Self {
            lifecycle: Arc::new(BookingLifecycle::new(repos.clone(), clock.clone())),
            bookings: Arc::new(BookingQueryService::new(repos.clone(), clock)),
            communities: Arc::new(CommunityService::new(repos.clone())),
            residents: Arc::new(ResidentService::new(repos.clone())),
            spots: Arc::new(ParkingSpotService::new(repos)),
            limits,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Communities
        communities::list_communities,
        communities::create_community,
        communities::get_community,
        // Residents
        residents::create_resident,
        residents::get_resident,
        residents::list_community_residents,
        // Parking spots
        spots::create_spot,
        spots::get_spot,
        spots::list_community_spots,
        spots::list_available_spots,
        // Bookings
        bookings::create_booking,
        bookings::get_booking,
        bookings::park_booking,
        bookings::release_booking,
        bookings::cancel_booking,
        bookings::list_resident_bookings,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<bookings::BookingDto>,
            communities::CommunityDto,
            communities::CreateCommunityRequest,
            residents::ResidentDto,
            residents::CreateResidentRequest,
            spots::ParkingSpotDto,
            spots::CreateParkingSpotRequest,
            bookings::BookingDto,
            bookings::CreateBookingRequest,
            bookings::CommunitySummary,
            bookings::ResidentSummary,
            bookings::SpotSummary,
            bookings::PeriodParam,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Communities", description = "Residential communities"),
        (name = "Residents", description = "Residents of a community"),
        (name = "Parking Spots", description = "Parking spots and their availability"),
        (name = "Bookings", description = "Spot bookings: reserve, park, release, cancel"),
    ),
    info(
        title = "Residential Parking API",
        version = "1.0.0",
        description = "REST API for booking parking spots in residential communities",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is mounted only when a Prometheus recorder is installed.
pub fn create_api_router(
    services: AppServices,
    health_state: HealthState,
    metrics_state: Option<MetricsState>,
) -> Router {
    let booking_state = BookingHandlerState {
        lifecycle: services.lifecycle.clone(),
        queries: services.bookings.clone(),
        limits: services.limits,
    };
    let community_state = CommunityHandlerState {
        service: services.communities.clone(),
        limits: services.limits,
    };
    let resident_state = ResidentHandlerState {
        service: services.residents.clone(),
        limits: services.limits,
    };
    let spot_state = SpotHandlerState {
        service: services.spots.clone(),
        limits: services.limits,
    };

    let booking_routes = Router::new()
        .route("/api/v1/bookings", post(bookings::create_booking))
        .route("/api/v1/bookings/{id}", get(bookings::get_booking))
        .route("/api/v1/bookings/{id}/park", put(bookings::park_booking))
        .route("/api/v1/bookings/{id}/release", put(bookings::release_booking))
        .route("/api/v1/bookings/{id}/cancel", put(bookings::cancel_booking))
        .route(
            "/api/v1/residents/{id}/bookings",
            get(bookings::list_resident_bookings),
        )
        .with_state(booking_state);

    let community_routes = Router::new()
        .route(
            "/api/v1/communities",
            get(communities::list_communities).post(communities::create_community),
        )
        .route("/api/v1/communities/{id}", get(communities::get_community))
        .with_state(community_state);

    let resident_routes = Router::new()
        .route("/api/v1/residents", post(residents::create_resident))
        .route("/api/v1/residents/{id}", get(residents::get_resident))
        .route(
            "/api/v1/communities/{id}/residents",
            get(residents::list_community_residents),
        )
        .with_state(resident_state);

    let spot_routes = Router::new()
        .route("/api/v1/spots", post(spots::create_spot))
        .route("/api/v1/spots/{id}", get(spots::get_spot))
        .route(
            "/api/v1/communities/{id}/spots",
            get(spots::list_community_spots),
        )
        .route(
            "/api/v1/communities/{id}/spots/available",
            get(spots::list_available_spots),
        )
        .with_state(spot_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let mut api = Router::new()
        .merge(booking_routes)
        .merge(community_routes)
        .merge(resident_routes)
        .merge(spot_routes)
        .merge(health_routes);

    if let Some(metrics_state) = metrics_state {
        api = api.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(metrics_state),
        );
    }

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        // route_layer so MatchedPath is available to the metrics labels
        .merge(api.route_layer(middleware::from_fn(http_metrics_middleware)))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────
