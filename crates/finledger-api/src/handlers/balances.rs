//! Balance CRUD handlers

use crate::error::AppError;
use crate::services::{BalanceService, BalanceUpdate, NewBalance};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use finledger_core::model::Balance;
use std::sync::Arc;
use uuid::Uuid;

/// Create a new balance snapshot
#[utoipa::path(
    post,
    path = "/api/v1/balances",
    tag = "balances",
    request_body = NewBalance,
    responses(
        (status = 201, description = "Balance created", body = Balance),
        (status = 401, description = "No token provided"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_balance(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewBalance>,
) -> Result<impl IntoResponse, AppError> {
    let balance = BalanceService::new(state.db.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(balance)))
}

/// Fetch a balance by id
#[utoipa::path(
    get,
    path = "/api/v1/balances/{id}",
    tag = "balances",
    params(("id" = Uuid, Path, description = "Balance id")),
    responses(
        (status = 200, description = "Balance found", body = Balance),
        (status = 404, description = "Balance not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let balance = BalanceService::new(state.db.clone()).get(id).await?;
    Ok(Json(balance))
}

/// Fetch the most recent balance for a user
#[utoipa::path(
    get,
    path = "/api/v1/balances/latest/{user_id}",
    tag = "balances",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Latest balance for the user", body = Balance),
        (status = 404, description = "No balance recorded", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_latest_balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let balance = BalanceService::new(state.db.clone())
        .get_latest_by_user(user_id)
        .await?;
    Ok(Json(balance))
}

/// Update an existing balance
#[utoipa::path(
    put,
    path = "/api/v1/balances/{id}",
    tag = "balances",
    params(("id" = Uuid, Path, description = "Balance id")),
    request_body = BalanceUpdate,
    responses(
        (status = 200, description = "Balance updated", body = Balance),
        (status = 404, description = "Balance not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_balance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(changes): Json<BalanceUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let balance = BalanceService::new(state.db.clone())
        .update(id, changes)
        .await?;
    Ok(Json(balance))
}

/// Soft-delete a balance
#[utoipa::path(
    delete,
    path = "/api/v1/balances/{id}",
    tag = "balances",
    params(("id" = Uuid, Path, description = "Balance id")),
    responses(
        (status = 204, description = "Balance deleted"),
        (status = 404, description = "Balance not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_balance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    BalanceService::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
