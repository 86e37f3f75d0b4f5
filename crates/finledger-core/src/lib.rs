//! finledger core - domain models, errors, and configuration
//!
//! This crate defines the shared types used throughout the finledger system:
//! - Ledger models (users, incomes, expenses, balances, trash entries)
//! - Common error types
//! - Configuration management

pub mod config;
pub mod model;

pub use config::{AppConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
pub use model::{Balance, EntryKind, Expense, Income, TrashEntry, User};

use thiserror::Error;

/// Core error types for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
