//! Authentication and authorization module
//!
//! This module provides JWT-based authentication:
//! - Token generation and verification with configurable claims and expiry
//! - Password hashing with Argon2
//! - Middleware for request authentication and role authorization

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{generate_token, verify_token, AuthConfig, Claims, TokenOptions, TokenPayload};
pub use middleware::{authenticate, authorize_roles, AuthError, Principal, RejectionBody};
pub use password::{hash_password, verify_password, PasswordError};
