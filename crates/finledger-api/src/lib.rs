//! Finledger API - REST server for the personal finance ledger
//!
//! Exposes JWT-protected CRUD endpoints over the core ledger models, with
//! role-gated admin routes, a soft-delete trash ledger, and Swagger docs.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use crate::state::AppState;
use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the ledger API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finledger API",
        description = "Personal finance ledger with JWT authentication and role-based access"
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::register_handler,
        handlers::auth::login_handler,
        handlers::auth::me_handler,
        handlers::incomes::create_income,
        handlers::incomes::get_income,
        handlers::incomes::update_income,
        handlers::incomes::delete_income,
        handlers::expenses::create_expense,
        handlers::expenses::get_expense,
        handlers::expenses::update_expense,
        handlers::expenses::delete_expense,
        handlers::balances::create_balance,
        handlers::balances::get_balance,
        handlers::balances::get_latest_balance,
        handlers::balances::update_balance,
        handlers::balances::delete_balance,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::trash::list_trash,
    ),
    components(schemas(
        handlers::health::HealthResponse,
        handlers::auth::RegisterRequest,
        handlers::auth::LoginRequest,
        handlers::auth::LoginResponse,
        handlers::users::CreateUserRequest,
        handlers::users::UpdateUserRequest,
        services::NewIncome,
        services::IncomeUpdate,
        services::NewExpense,
        services::ExpenseUpdate,
        services::NewBalance,
        services::BalanceUpdate,
        error::ApiError,
        finledger_core::model::User,
        finledger_core::model::Income,
        finledger_core::model::Expense,
        finledger_core::model::Balance,
        finledger_core::model::TrashEntry,
        finledger_core::model::EntryKind,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness and service stats"),
        (name = "auth", description = "Registration, login, and current principal"),
        (name = "incomes", description = "Income entries"),
        (name = "expenses", description = "Expense entries"),
        (name = "balances", description = "Balance snapshots"),
        (name = "users", description = "User administration (admin role)"),
        (name = "trash", description = "Soft-delete ledger (admin role)"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the full application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", routes::api_router(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::log_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Signing secret used by the test router
#[cfg(feature = "test-utils")]
pub const TEST_SECRET: &str = "test-secret-key-12345";

/// Router over throwaway state, for driving requests in tests without a
/// running database. Tokens minted with [`TEST_SECRET`] verify against it.
#[cfg(feature = "test-utils")]
pub fn create_router_for_testing() -> Router {
    create_router(Arc::new(AppState::for_testing(TEST_SECRET)))
}
