//! Expense CRUD handlers

use crate::error::AppError;
use crate::services::{ExpenseService, ExpenseUpdate, NewExpense};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use finledger_core::model::Expense;
use std::sync::Arc;
use uuid::Uuid;

/// Create a new expense
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    tag = "expenses",
    request_body = NewExpense,
    responses(
        (status = 201, description = "Expense created", body = Expense),
        (status = 401, description = "No token provided"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewExpense>,
) -> Result<impl IntoResponse, AppError> {
    let expense = ExpenseService::new(state.db.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Fetch an expense by id
#[utoipa::path(
    get,
    path = "/api/v1/expenses/{id}",
    tag = "expenses",
    params(("id" = Uuid, Path, description = "Expense id")),
    responses(
        (status = 200, description = "Expense found", body = Expense),
        (status = 404, description = "Expense not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let expense = ExpenseService::new(state.db.clone()).get(id).await?;
    Ok(Json(expense))
}

/// Update an existing expense
#[utoipa::path(
    put,
    path = "/api/v1/expenses/{id}",
    tag = "expenses",
    params(("id" = Uuid, Path, description = "Expense id")),
    request_body = ExpenseUpdate,
    responses(
        (status = 200, description = "Expense updated", body = Expense),
        (status = 404, description = "Expense not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(changes): Json<ExpenseUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let expense = ExpenseService::new(state.db.clone())
        .update(id, changes)
        .await?;
    Ok(Json(expense))
}

/// Soft-delete an expense
#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{id}",
    tag = "expenses",
    params(("id" = Uuid, Path, description = "Expense id")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ExpenseService::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
