//! Transaction ledger handlers.

use axum::{
    extract::{Extension, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::Transaction;
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Ledger listing query
#[derive(Debug, Deserialize, IntoParams)]
pub struct LedgerQuery {
    /// Request the global ledger (admin role required)
    pub admin: Option<bool>,
    /// Page number, 1-based
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
}

impl LedgerQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(
            self.page.unwrap_or(DEFAULT_PAGE_NUMBER),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Create transaction routes
pub fn transaction_routes() -> Router<AppState> {
    Router::new().route("/list", get(list_transactions))
}

/// List audit transactions, newest first.
///
/// With `admin=true` and the admin role, returns the global ledger.
/// Otherwise returns the caller's own ledger entries; an empty personal
/// ledger is a 404.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/list",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(LedgerQuery),
    responses(
        (status = 200, description = "Ledger page", body = [Transaction]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Global ledger requires admin role"),
        (status = 404, description = "No transactions found for this user")
    )
)]
pub async fn list_transactions(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
) -> AppResult<Json<Paginated<Transaction>>> {
    let page = if query.admin.unwrap_or(false) {
        require_admin(&current_user)?;
        state
            .transaction_service
            .get_all_transactions(query.pagination())
            .await?
    } else {
        state
            .transaction_service
            .get_user_transactions(current_user.id, query.pagination())
            .await?
    };

    Ok(Json(page))
}
