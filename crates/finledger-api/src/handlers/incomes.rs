//! Income CRUD handlers

use crate::error::AppError;
use crate::services::{IncomeService, IncomeUpdate, NewIncome};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use finledger_core::model::Income;
use std::sync::Arc;
use uuid::Uuid;

/// Create a new income
#[utoipa::path(
    post,
    path = "/api/v1/incomes",
    tag = "incomes",
    request_body = NewIncome,
    responses(
        (status = 201, description = "Income created", body = Income),
        (status = 401, description = "No token provided"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewIncome>,
) -> Result<impl IntoResponse, AppError> {
    let income = IncomeService::new(state.db.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(income)))
}

/// Fetch an income by id
#[utoipa::path(
    get,
    path = "/api/v1/incomes/{id}",
    tag = "incomes",
    params(("id" = Uuid, Path, description = "Income id")),
    responses(
        (status = 200, description = "Income found", body = Income),
        (status = 404, description = "Income not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let income = IncomeService::new(state.db.clone()).get(id).await?;
    Ok(Json(income))
}

/// Update an existing income
#[utoipa::path(
    put,
    path = "/api/v1/incomes/{id}",
    tag = "incomes",
    params(("id" = Uuid, Path, description = "Income id")),
    request_body = IncomeUpdate,
    responses(
        (status = 200, description = "Income updated", body = Income),
        (status = 404, description = "Income not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(changes): Json<IncomeUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let income = IncomeService::new(state.db.clone()).update(id, changes).await?;
    Ok(Json(income))
}

/// Soft-delete an income
#[utoipa::path(
    delete,
    path = "/api/v1/incomes/{id}",
    tag = "incomes",
    params(("id" = Uuid, Path, description = "Income id")),
    responses(
        (status = 204, description = "Income deleted"),
        (status = 404, description = "Income not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    IncomeService::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
