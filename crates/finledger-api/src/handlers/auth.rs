//! Authentication handlers: register, login, current principal
//!
//! Login is where tokens are minted: the user's id, name, email, and role
//! become the claims payload handed to `generate_token`.

use crate::auth::jwt::DEFAULT_EXPIRES_IN_SECS;
use crate::auth::{generate_token, hash_password, verify_password, Principal, TokenPayload};
use crate::error::AppError;
use crate::services::{NewUser, UserService};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use finledger_core::model::User;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response with the issued token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: User,
}

/// Register a new user account
///
/// New accounts get the `user` role; role changes are an admin operation.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !request.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }
    if request.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name must not be empty".to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))?;

    let user = UserService::new(state.db.clone())
        .create(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            role: "user".to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with email and password, minting a JWT on success
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::new(state.db.clone())
        .find_by_email(&request.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let password_valid = verify_password(&request.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {e}")))?;
    if !password_valid {
        return Err(AppError::Unauthorized);
    }

    let mut payload = TokenPayload::new();
    payload.insert("sub".to_string(), json!(user.id.to_string()));
    payload.insert("name".to_string(), json!(user.name));
    payload.insert("email".to_string(), json!(user.email));
    payload.insert("role".to_string(), json!(user.role));

    // The signing failure detail is already logged where it happened; the
    // caller only learns that issuance failed.
    let token = generate_token(&state.auth, payload, None)
        .map_err(|_| AppError::Internal("Failed to generate token".to_string()))?;

    let expires_in = state
        .auth
        .default_options
        .expires_in_secs
        .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in,
        user,
    }))
}

/// Return the claims of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Decoded claims of the current principal"),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Invalid token"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me_handler(
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(principal.claims))
}
