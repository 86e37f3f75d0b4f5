//! Route table
//!
//! Three tiers: public auth endpoints, token-protected CRUD, and admin-only
//! routes that additionally require the `admin` role claim.

use crate::auth::{authenticate, authorize_roles};
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the `/api/v1` router
pub fn api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .route("/auth/register", post(handlers::auth::register_handler))
        .route("/auth/login", post(handlers::auth::login_handler));

    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me_handler))
        .route("/incomes", post(handlers::incomes::create_income))
        .route(
            "/incomes/:id",
            get(handlers::incomes::get_income)
                .put(handlers::incomes::update_income)
                .delete(handlers::incomes::delete_income),
        )
        .route("/expenses", post(handlers::expenses::create_expense))
        .route(
            "/expenses/:id",
            get(handlers::expenses::get_expense)
                .put(handlers::expenses::update_expense)
                .delete(handlers::expenses::delete_expense),
        )
        .route("/balances", post(handlers::balances::create_balance))
        .route(
            "/balances/latest/:user_id",
            get(handlers::balances::get_latest_balance),
        )
        .route(
            "/balances/:id",
            get(handlers::balances::get_balance)
                .put(handlers::balances::update_balance)
                .delete(handlers::balances::delete_balance),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Layers run outside-in, so `authenticate` (added last) decodes the token
    // before the role check sees the principal.
    let admin = Router::new()
        .route("/users", post(handlers::users::create_user))
        .route(
            "/users/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/trash", get(handlers::trash::list_trash))
        .route_layer(middleware::from_fn(authorize_roles(&["admin"])))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    public.merge(protected).merge(admin)
}
