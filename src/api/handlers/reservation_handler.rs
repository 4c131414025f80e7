//! Reservation handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::middleware::{require_admin, require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{DashboardStats, Reservation, ReservationWithConcert};
use crate::errors::AppResult;
use crate::types::{Created, PaginationParams};

/// Reservation listing query
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationListQuery {
    /// Request the global paged listing (admin role required)
    pub admin: Option<bool>,
    /// Page number, 1-based
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
}

impl ReservationListQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(
            self.page.unwrap_or(DEFAULT_PAGE_NUMBER),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Create reservation routes
pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations))
        .route("/dashboard", get(dashboard))
        .route("/:user_id", get(user_reservations))
        .route(
            "/:user_id/:concert_id",
            axum::routing::post(reserve_seat).delete(cancel_reserve),
        )
}

/// Reserve a seat on a concert
#[utoipa::path(
    post,
    path = "/api/v1/reserve/{user_id}/{concert_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("concert_id" = Uuid, Path, description = "Concert ID")
    ),
    responses(
        (status = 201, description = "Seat reserved", body = Reservation),
        (status = 400, description = "Concert cancelled or no seats available"),
        (status = 404, description = "User or concert not found"),
        (status = 409, description = "Duplicate or previously cancelled reservation")
    )
)]
pub async fn reserve_seat(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((user_id, concert_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Created<Reservation>> {
    require_self_or_admin(&current_user, user_id)?;

    let reservation = state
        .reservation_service
        .reserve_seat(user_id, concert_id)
        .await?;

    Ok(Created(reservation))
}

/// Cancel a reservation
#[utoipa::path(
    delete,
    path = "/api/v1/reserve/{user_id}/{concert_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("concert_id" = Uuid, Path, description = "Concert ID")
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 400, description = "Reservation already cancelled"),
        (status = 404, description = "User, concert or reservation not found")
    )
)]
pub async fn cancel_reserve(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((user_id, concert_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Reservation>> {
    require_self_or_admin(&current_user, user_id)?;

    let reservation = state
        .reservation_service
        .cancel_reserve(user_id, concert_id)
        .await?;

    Ok(Json(reservation))
}

/// List reservations.
///
/// With `admin=true` and the admin role, returns the global paged list
/// with user and concert display names. Otherwise returns the caller's
/// own reservations with full concert detail.
#[utoipa::path(
    get,
    path = "/api/v1/reserve",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(ReservationListQuery),
    responses(
        (status = 200, description = "Reservation listing"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin listing requires admin role")
    )
)]
pub async fn list_reservations(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Response> {
    if query.admin.unwrap_or(false) {
        require_admin(&current_user)?;
        let page = state
            .reservation_service
            .get_list_reservation(query.pagination())
            .await?;
        return Ok(Json(page).into_response());
    }

    let own = state
        .reservation_service
        .get_user_reservations(current_user.id)
        .await?;
    Ok(Json(own).into_response())
}

/// List one user's reservations (own or admin)
#[utoipa::path(
    get,
    path = "/api/v1/reserve/{user_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User reservations", body = [ReservationWithConcert]),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_reservations(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<ReservationWithConcert>>> {
    require_self_or_admin(&current_user, user_id)?;
    let reservations = state.reservation_service.get_user_reservations(user_id).await?;
    Ok(Json(reservations))
}

/// Aggregate reservation metrics (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/reserve/dashboard",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard metrics", body = DashboardStats),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn dashboard(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<DashboardStats>> {
    require_admin(&current_user)?;
    let stats = state.reservation_service.get_dashboard_stats().await?;
    Ok(Json(stats))
}
