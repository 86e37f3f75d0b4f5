//! Authentication and role-authorization middleware
//!
//! `authenticate` validates the bearer token on an inbound request and
//! attaches the decoded claims as the request's [`Principal`];
//! `authorize_roles` gates a route on the `role` claim of that principal.
//! The two communicate only through request extensions, so route composition
//! order (authenticate first) is the caller's responsibility.

use super::jwt::{verify_token, Claims};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

/// Decoded claims of the authenticated caller
///
/// Present in request extensions only if `authenticate` succeeded; read-only
/// to everything downstream of it.
#[derive(Debug, Clone)]
pub struct Principal {
    pub claims: Claims,
}

impl Principal {
    /// The `role` claim, if present
    pub fn role(&self) -> Option<&str> {
        self.claims.role()
    }
}

/// Fixed-shape JSON body for every auth rejection
#[derive(Debug, Serialize, Deserialize)]
pub struct RejectionBody {
    pub success: bool,
    pub message: String,
    pub code: String,
}

/// Authentication and authorization failures
///
/// Client-visible messages are generic and fixed per variant; the detail of
/// why a token failed verification only ever reaches the server log.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access denied: No token provided")]
    TokenMissing,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Access denied: Insufficient permissions")]
    InsufficientPermissions,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::TokenMissing => StatusCode::UNAUTHORIZED,
            AuthError::TokenInvalid | AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::TokenMissing => "TOKEN_MISSING",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = RejectionBody {
            success: false,
            message: self.to_string(),
            code: self.code().to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Authentication middleware
///
/// Reads the `Authorization` header and takes the second whitespace-delimited
/// segment as the candidate token; the scheme word itself is never
/// inspected. Terminal on the first matching branch:
///
/// 1. no header or no second segment - 401 `TOKEN_MISSING`;
/// 2. verification fails (bad signature, malformed, expired) - 403
///    `TOKEN_INVALID`;
/// 3. verification succeeds - attach the [`Principal`] and run the inner
///    handler.
///
/// The principal is attached and the inner handler invoked strictly after the
/// verification resolves; nothing else runs for this request in between.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split_whitespace().nth(1));

    let Some(token) = token else {
        error!("Access denied: No token provided");
        return Err(AuthError::TokenMissing);
    };

    let claims = verify_token(&state.auth, token).map_err(|e| {
        error!(error = %e, "Invalid token");
        AuthError::TokenInvalid
    })?;

    request.extensions_mut().insert(Principal { claims });

    Ok(next.run(request).await)
}

/// Type alias for the role middleware future
type RoleMiddlewareFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>;

/// Middleware factory for role-based access control
///
/// The permitted role set is fixed when the middleware is constructed for a
/// route. At request time, a missing principal or a `role` claim outside the
/// set rejects with 403 `INSUFFICIENT_PERMISSIONS`. Membership is exact
/// string equality; there is no role hierarchy and no wildcard.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use finledger_api::auth::middleware::{authenticate, authorize_roles};
///
/// let app = Router::new()
///     .route("/admin", get(admin_handler))
///     .route_layer(middleware::from_fn(authorize_roles(&["admin"])))
///     .route_layer(middleware::from_fn_with_state(state, authenticate));
/// ```
pub fn authorize_roles(
    roles: &'static [&'static str],
) -> impl Fn(Request<Body>, Next) -> RoleMiddlewareFuture + Clone {
    move |request: Request<Body>, next: Next| {
        Box::pin(async move {
            let principal = request.extensions().get::<Principal>();
            let permitted = principal
                .and_then(Principal::role)
                .map(|role| roles.contains(&role))
                .unwrap_or(false);

            if !permitted {
                warn!(
                    principal = ?principal,
                    "Access denied: Insufficient permissions"
                );
                return Err(AuthError::InsufficientPermissions);
            }

            Ok(next.run(request).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{generate_token, AuthConfig, TokenOptions, TokenPayload};
    use axum::{middleware, routing::get, Extension, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::for_testing("test-secret-key-12345"))
    }

    fn admin_payload() -> TokenPayload {
        let mut payload = TokenPayload::new();
        payload.insert("userId".to_string(), json!(1));
        payload.insert("role".to_string(), json!("admin"));
        payload
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request_with_auth(header_value: Option<&str>) -> axum::http::Request<Body> {
        let builder = axum::http::Request::builder().uri("/protected");
        let builder = match header_value {
            Some(v) => builder.header(header::AUTHORIZATION, v),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    fn protected_app(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/protected",
                get(|Extension(principal): Extension<Principal>| async move {
                    Json(principal.claims)
                }),
            )
            .route_layer(middleware::from_fn_with_state(state, authenticate))
    }

    #[test]
    fn test_rejection_statuses_and_codes() {
        assert_eq!(AuthError::TokenMissing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenInvalid.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::InsufficientPermissions.status(),
            StatusCode::FORBIDDEN
        );

        assert_eq!(AuthError::TokenMissing.code(), "TOKEN_MISSING");
        assert_eq!(AuthError::TokenInvalid.code(), "TOKEN_INVALID");
        assert_eq!(
            AuthError::InsufficientPermissions.code(),
            "INSUFFICIENT_PERMISSIONS"
        );
    }

    #[tokio::test]
    async fn test_rejection_body_shape() {
        let response = AuthError::TokenMissing.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Access denied: No token provided");
        assert_eq!(json["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let app = protected_app(test_state());

        let response = app.oneshot(request_with_auth(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn test_bearer_with_no_token_rejected() {
        let app = protected_app(test_state());

        // Header present but no second segment
        let response = app.oneshot(request_with_auth(Some("Bearer"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let app = protected_app(test_state());

        let response = app
            .oneshot(request_with_auth(Some("Bearer not.a.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let state = test_state();
        let other = AuthConfig::new("another-secret-entirely");
        let token = generate_token(&other, admin_payload(), None).unwrap();

        let app = protected_app(state);
        let response = app
            .oneshot(request_with_auth(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        // Wrong secret is invalid, never missing
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn test_valid_token_attaches_principal() {
        let state = test_state();
        let token = generate_token(&state.auth, admin_payload(), None).unwrap();

        let app = protected_app(state);
        let response = app
            .oneshot(request_with_auth(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["userId"], 1);
        assert_eq!(json["role"], "admin");
        assert!(json["iat"].is_number());
        assert!(json["exp"].is_number());
    }

    #[tokio::test]
    async fn test_role_gate_accepts_and_invokes_downstream_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let state = test_state();
        let token = generate_token(
            &state.auth,
            admin_payload(),
            Some(TokenOptions::expires_in(3600)),
        )
        .unwrap();

        let app = Router::new()
            .route(
                "/protected",
                get(|| async {
                    CALLS.fetch_add(1, Ordering::SeqCst);
                    StatusCode::OK
                }),
            )
            .route_layer(middleware::from_fn(authorize_roles(&[
                "admin",
                "superadmin",
            ])))
            .route_layer(middleware::from_fn_with_state(state, authenticate));

        let response = app
            .oneshot(request_with_auth(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_role_gate_rejects_wrong_role() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let state = test_state();
        let mut payload = TokenPayload::new();
        payload.insert("userId".to_string(), json!(2));
        payload.insert("role".to_string(), json!("user"));
        let token = generate_token(&state.auth, payload, None).unwrap();

        let app = Router::new()
            .route(
                "/protected",
                get(|| async {
                    CALLS.fetch_add(1, Ordering::SeqCst);
                    StatusCode::OK
                }),
            )
            .route_layer(middleware::from_fn(authorize_roles(&["admin"])))
            .route_layer(middleware::from_fn_with_state(state, authenticate));

        let response = app
            .oneshot(request_with_auth(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["code"],
            "INSUFFICIENT_PERMISSIONS"
        );
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_role_gate_rejects_when_principal_absent() {
        // Route composed without the authentication layer: the gate must
        // still reject, it never trusts a bare request.
        let app = Router::new()
            .route("/protected", get(|| async { StatusCode::OK }))
            .route_layer(middleware::from_fn(authorize_roles(&["admin"])));

        let response = app.oneshot(request_with_auth(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["code"],
            "INSUFFICIENT_PERMISSIONS"
        );
    }
}
