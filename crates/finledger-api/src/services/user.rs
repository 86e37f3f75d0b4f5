//! User service
//!
//! Account storage with unique emails. Password hashes come in pre-hashed
//! from the handlers; this layer never sees a plaintext password.

use super::trash::file_snapshot;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use finledger_core::model::User;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

/// New user input (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Partial user update; unset fields keep their current values
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(rec: UserRecord) -> Self {
        User {
            id: rec.id,
            name: rec.name,
            email: rec.email,
            password_hash: rec.password_hash,
            role: rec.role,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        }
    }
}

const COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a new user; duplicate emails are a client error
    pub async fn create(&self, input: NewUser) -> Result<User, AppError> {
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(&input.email)
                .fetch_one(&self.db)
                .await
                .map_err(|e| {
                    error!(error = %e, "Error creating user");
                    AppError::Database("Failed to create user".to_string())
                })?;

        if existing > 0 {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.role)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error creating user");
            AppError::Database("Failed to create user".to_string())
        })?;

        Ok(record.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error retrieving user");
            AppError::Database("Failed to retrieve user".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(record.into())
    }

    /// Look up a user by email for login; `None` when absent
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error retrieving user");
            AppError::Database("Failed to retrieve user".to_string())
        })?;

        Ok(record.map(User::from))
    }

    pub async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<User, AppError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                password_hash = COALESCE($4, password_hash), \
                role = COALESCE($5, role), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.role)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error updating user");
            AppError::Database("Failed to update user".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(record.into())
    }

    /// Soft-delete a user, filing a snapshot in the trash ledger
    ///
    /// The snapshot goes through the API model, so the password hash is
    /// excluded from the trash data.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Error deleting user");
            AppError::Database("Failed to delete user".to_string())
        })?;

        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Error deleting user");
            AppError::Database("Failed to delete user".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let snapshot = serde_json::to_value(User::from(record)).map_err(|e| {
            error!(error = %e, "Error deleting user");
            AppError::Database("Failed to delete user".to_string())
        })?;
        file_snapshot(&mut tx, "users", id, snapshot).await?;

        sqlx::query("UPDATE users SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, "Error deleting user");
                AppError::Database("Failed to delete user".to_string())
            })?;

        tx.commit().await.map_err(|e| {
            error!(error = %e, "Error deleting user");
            AppError::Database("Failed to delete user".to_string())
        })?;

        Ok(())
    }
}
