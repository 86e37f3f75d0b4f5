//! JWT token signing and verification
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing. Tokens carry
//! an open set of caller-supplied claims plus `iat`/`exp`; by convention the
//! payload includes a `role` claim consumed by the role-authorization
//! middleware.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{error, warn};

/// Default token lifetime in seconds (one hour)
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Legacy fallback signing secret.
///
/// A process that reaches this value is warned loudly at startup; it must
/// never be used in production.
pub const FALLBACK_SECRET: &str = "secretkey";

/// Open mapping of caller-supplied claims embedded in a token
pub type TokenPayload = Map<String, Value>;

/// JWT claims: the caller payload flattened alongside standard expiry metadata
///
/// The decoded form of this struct is what gets attached to a request as its
/// principal after successful verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Issued at (Unix epoch seconds)
    pub iat: u64,
    /// Expiration (Unix epoch seconds)
    pub exp: u64,
    /// Caller-supplied claims
    #[serde(flatten)]
    pub payload: TokenPayload,
}

impl Claims {
    /// The `role` claim, if present and a string
    pub fn role(&self) -> Option<&str> {
        self.payload.get("role").and_then(Value::as_str)
    }

    /// Look up an arbitrary claim by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

/// Per-call token options; unset fields fall back to the configured defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenOptions {
    /// Token lifetime in seconds
    pub expires_in_secs: Option<u64>,
}

impl TokenOptions {
    pub fn expires_in(secs: u64) -> Self {
        Self {
            expires_in_secs: Some(secs),
        }
    }

    /// Shallow merge: values from `overrides` win key-by-key
    fn merged(self, overrides: TokenOptions) -> TokenOptions {
        TokenOptions {
            expires_in_secs: overrides.expires_in_secs.or(self.expires_in_secs),
        }
    }
}

/// Signing secret and default token options
///
/// Constructed once at process start and shared read-only across all
/// requests via the application state; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for HMAC signing
    pub secret_key: String,
    /// Defaults applied to every issued token unless overridden per call
    pub default_options: TokenOptions,
}

impl AuthConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            default_options: TokenOptions::expires_in(DEFAULT_EXPIRES_IN_SECS),
        }
    }

    /// Build from `JWT_SECRET_KEY` and `JWT_EXPIRES_IN_SECS`
    ///
    /// An unset or empty secret falls back to [`FALLBACK_SECRET`], with a
    /// prominent warning. The fallback exists for backwards compatibility,
    /// not endorsement.
    pub fn from_env() -> Self {
        let secret_key = match std::env::var("JWT_SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!(
                    "JWT_SECRET_KEY is unset or empty; using the built-in default secret. \
                     Tokens signed with this key are forgeable - set JWT_SECRET_KEY before \
                     running in production"
                );
                FALLBACK_SECRET.to_string()
            }
        };

        let expires_in_secs = std::env::var("JWT_EXPIRES_IN_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        Self {
            secret_key,
            default_options: TokenOptions::expires_in(expires_in_secs),
        }
    }
}

/// Token signing and verification errors
///
/// The variants distinguishing expired, bad-signature, and malformed tokens
/// exist for server-side logging only; clients always see the same generic
/// rejection regardless of which one occurred.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed; the underlying cause is logged, never surfaced
    #[error("Failed to generate token")]
    TokenGeneration,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid token format")]
    Malformed,
}

/// Sign a new token from a claims payload
///
/// Effective options are the configured defaults shallow-merged with
/// `options`, per-call values winning key-by-key. `iat` and `exp` are always
/// set here; matching keys in the payload are discarded.
///
/// Any failure of the underlying signing operation is logged with its
/// original message and surfaced as the generic [`JwtError::TokenGeneration`].
pub fn generate_token(
    config: &AuthConfig,
    mut payload: TokenPayload,
    options: Option<TokenOptions>,
) -> Result<String, JwtError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| {
            error!(error = %e, "Error generating token");
            JwtError::TokenGeneration
        })?
        .as_secs();

    let effective = config.default_options.merged(options.unwrap_or_default());
    let expires_in = effective.expires_in_secs.unwrap_or(DEFAULT_EXPIRES_IN_SECS);

    // Reserved claims are owned by the signer
    payload.remove("iat");
    payload.remove("exp");

    let claims = Claims {
        iat: now,
        exp: now + expires_in,
        payload,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, "Error generating token");
        JwtError::TokenGeneration
    })
}

/// Verify a token's signature and expiry and extract its claims
///
/// Expiry is enforced at the exact `exp` instant; there is no acceptance
/// window for recently expired tokens.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::Malformed,
    })?;

    Ok(token_data.claims)
}
