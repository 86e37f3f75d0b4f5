//! Trash ledger handlers (admin only)

use crate::error::AppError;
use crate::services::TrashService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use finledger_core::model::TrashEntry;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

const DEFAULT_LIMIT: i64 = 100;

/// Trash listing query
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct TrashQuery {
    /// Maximum number of entries to return (default 100)
    pub limit: Option<i64>,
}

/// List the most recent trash entries
#[utoipa::path(
    get,
    path = "/api/v1/trash",
    tag = "trash",
    params(TrashQuery),
    responses(
        (status = 200, description = "Recent trash entries", body = [TrashEntry]),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Insufficient permissions"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_trash(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrashQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 1000);
    let entries = TrashService::new(state.db.clone()).list(limit).await?;
    Ok(Json(entries))
}
