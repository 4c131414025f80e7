//! Concert handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{CancelOutcome, Concert, ConcertWithReservation, CreateConcert, UpdateConcert};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated, PaginationParams};

/// Concert creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConcertRequest {
    /// Concert name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Midnight Symphony")]
    pub name: String,
    /// Optional description
    #[schema(example = "An open-air orchestral night")]
    pub description: Option<String>,
    /// Seat capacity
    #[validate(range(min = 1, message = "maxSeats must be at least 1"))]
    #[schema(example = 500, minimum = 1)]
    pub max_seats: i32,
}

/// Concert update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateConcertRequest {
    /// New name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New seat capacity
    #[validate(range(min = 1, message = "maxSeats must be at least 1"))]
    pub max_seats: Option<i32>,
}

/// Catalog pagination query
#[derive(Debug, Deserialize, IntoParams)]
pub struct CatalogQuery {
    /// Page number, 1-based
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
}

impl CatalogQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(
            self.page.unwrap_or(DEFAULT_PAGE_NUMBER),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Create concert routes
pub fn concert_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_concert))
        .route("/list", get(list_concerts))
        .route(
            "/:id",
            get(get_concert).put(update_concert).delete(delete_concert),
        )
        .route("/:id/cancel", patch(cancel_concert))
}

/// Create a new concert (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/concerts/create",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    request_body = CreateConcertRequest,
    responses(
        (status = 201, description = "Concert created", body = Concert),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_concert(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateConcertRequest>,
) -> AppResult<Created<Concert>> {
    require_admin(&current_user)?;

    let concert = state
        .concert_service
        .create(CreateConcert {
            name: payload.name,
            description: payload.description,
            max_seats: payload.max_seats,
        })
        .await?;

    Ok(Created(concert))
}

/// List non-deleted concerts, annotated with the caller's reservations
#[utoipa::path(
    get,
    path = "/api/v1/concerts/list",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    params(CatalogQuery),
    responses(
        (status = 200, description = "Concert catalog page", body = [ConcertWithReservation]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_concerts(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<Paginated<ConcertWithReservation>>> {
    let page = state
        .concert_service
        .find_all(query.pagination(), Some(current_user.id))
        .await?;

    Ok(Json(page))
}

/// Get a single concert
#[utoipa::path(
    get,
    path = "/api/v1/concerts/{id}",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Concert ID")
    ),
    responses(
        (status = 200, description = "Concert detail", body = Concert),
        (status = 404, description = "Concert not found")
    )
)]
pub async fn get_concert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Concert>> {
    let concert = state.concert_service.find_one(id).await?;
    Ok(Json(concert))
}

/// Update concert details (admin only)
#[utoipa::path(
    put,
    path = "/api/v1/concerts/{id}",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Concert ID")
    ),
    request_body = UpdateConcertRequest,
    responses(
        (status = 200, description = "Concert updated", body = Concert),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Concert not found")
    )
)]
pub async fn update_concert(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateConcertRequest>,
) -> AppResult<Json<Concert>> {
    require_admin(&current_user)?;

    let concert = state
        .concert_service
        .update(
            id,
            UpdateConcert {
                name: payload.name,
                description: payload.description,
                max_seats: payload.max_seats,
            },
        )
        .await?;

    Ok(Json(concert))
}

/// Cancel a concert and cascade over its reservations (admin only)
#[utoipa::path(
    patch,
    path = "/api/v1/concerts/{id}/cancel",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Concert ID")
    ),
    responses(
        (status = 200, description = "Concert cancelled", body = CancelOutcome),
        (status = 400, description = "Concert already cancelled"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Concert not found")
    )
)]
pub async fn cancel_concert(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CancelOutcome>> {
    require_admin(&current_user)?;
    let outcome = state.concert_service.cancel(id).await?;
    Ok(Json(outcome))
}

/// Hard-delete a concert (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/concerts/{id}",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Concert ID")
    ),
    responses(
        (status = 204, description = "Concert deleted"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Concert not found")
    )
)]
pub async fn delete_concert(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&current_user)?;
    state.concert_service.remove(id).await?;
    Ok(NoContent)
}
