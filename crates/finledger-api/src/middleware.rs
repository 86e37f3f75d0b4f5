//! Request logging middleware

use crate::state::AppState;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Log every request with its method, path, status, and latency, and bump
/// the request counter exposed by the health endpoint.
pub async fn log_requests(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    state.increment_requests();

    let response = next.run(request).await;

    let latency_ms = start.elapsed().as_millis();
    info!(
        %method,
        path,
        status = response.status().as_u16(),
        latency_ms,
        "request completed"
    );

    response
}
