//! Application state management

use crate::auth::AuthConfig;
use finledger_core::config::AppConfig;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Application state shared across handlers
///
/// Constructed once at process start and shared via `Arc`; everything here is
/// read-only per request (the counters are atomic), so no locking is needed.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// JWT signing secret and default token options
    pub auth: AuthConfig,
    /// PostgreSQL connection pool
    pub db: PgPool,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
}

impl AppState {
    pub fn new(config: AppConfig, auth: AuthConfig, db: PgPool) -> Self {
        Self {
            config,
            auth,
            db,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Increment the request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// State with a fixed secret and a lazy pool that never connects unless a
    /// handler actually touches the database
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing(secret: &str) -> Self {
        let config = AppConfig::default();
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .expect("lazy pool construction cannot fail on a valid URL");

        Self::new(config, AuthConfig::new(secret), db)
    }
}
