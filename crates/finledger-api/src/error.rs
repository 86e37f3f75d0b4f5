//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// API error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new("NOT_FOUND", format!("{resource} not found"))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn unauthorized() -> Self {
        Self::new("UNAUTHORIZED", "Authentication required")
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
///
/// `NotFound`, `BadRequest`, and `Database` messages are client-visible and
/// must stay generic. `Internal` carries diagnostic detail that is logged
/// when the response is built and never echoed to the client.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Internal(String),
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::not_found(&msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, ApiError::unauthorized()),
            AppError::Internal(detail) => {
                // The detail stays in the log; the client gets the fixed body
                error!(%detail, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal_error())
            }
            AppError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("DATABASE_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<finledger_core::LedgerError> for AppError {
    fn from(err: finledger_core::LedgerError) -> Self {
        use finledger_core::LedgerError;

        match err {
            LedgerError::NotFound(msg) => AppError::NotFound(msg),
            LedgerError::Validation(msg) => AppError::BadRequest(msg),
            LedgerError::Database(msg) => AppError::Database(msg),
            LedgerError::Config(msg) => AppError::Internal(msg),
            LedgerError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        let not_found = AppError::NotFound("Income".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad_request = AppError::BadRequest("bad".to_string()).into_response();
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);

        let unauthorized = AppError::Unauthorized.into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let database = AppError::Database("down".to_string()).into_response();
        assert_eq!(database.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_detail_not_echoed() {
        let response = AppError::Internal("argon2 backend failure".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["message"], "Internal server error");
        assert!(!bytes.windows(6).any(|w| w == b"argon2"));
    }

    #[test]
    fn test_ledger_error_mapping() {
        use finledger_core::LedgerError;

        let err: AppError = LedgerError::NotFound("Expense".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = LedgerError::Validation("amount".to_string()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
