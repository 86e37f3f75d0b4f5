//! Balance service
//!
//! Point-in-time balance summaries per user, plus a "latest balance" lookup
//! ordered by the balance date.

use super::trash::file_snapshot;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use finledger_core::model::Balance;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

/// New balance request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewBalance {
    pub user_id: Uuid,
    pub total_income: f64,
    pub total_expenses: f64,
    pub date: DateTime<Utc>,
}

/// Partial balance update; unset fields keep their current values
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BalanceUpdate {
    pub total_income: Option<f64>,
    pub total_expenses: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct BalanceRecord {
    id: Uuid,
    user_id: Uuid,
    total_income: f64,
    total_expenses: f64,
    date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BalanceRecord> for Balance {
    fn from(rec: BalanceRecord) -> Self {
        Balance {
            id: rec.id,
            user_id: rec.user_id,
            total_income: rec.total_income,
            total_expenses: rec.total_expenses,
            date: rec.date,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        }
    }
}

const COLUMNS: &str = "id, user_id, total_income, total_expenses, date, created_at, updated_at";

pub struct BalanceService {
    db: PgPool,
}

impl BalanceService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewBalance) -> Result<Balance, AppError> {
        let record = sqlx::query_as::<_, BalanceRecord>(&format!(
            "INSERT INTO balances (id, user_id, total_income, total_expenses, date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(input.total_income)
        .bind(input.total_expenses)
        .bind(input.date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error creating balance");
            AppError::Database("Failed to create balance".to_string())
        })?;

        Ok(record.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Balance, AppError> {
        let record = sqlx::query_as::<_, BalanceRecord>(&format!(
            "SELECT {COLUMNS} FROM balances WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error retrieving balance");
            AppError::Database("Failed to retrieve balance".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Balance".to_string()))?;

        Ok(record.into())
    }

    /// Most recent balance for a user, by balance date
    pub async fn get_latest_by_user(&self, user_id: Uuid) -> Result<Balance, AppError> {
        let record = sqlx::query_as::<_, BalanceRecord>(&format!(
            "SELECT {COLUMNS} FROM balances WHERE user_id = $1 AND deleted_at IS NULL \
             ORDER BY date DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error retrieving latest balance");
            AppError::Database("Failed to retrieve balance".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Balance".to_string()))?;

        Ok(record.into())
    }

    pub async fn update(&self, id: Uuid, changes: BalanceUpdate) -> Result<Balance, AppError> {
        let record = sqlx::query_as::<_, BalanceRecord>(&format!(
            "UPDATE balances SET \
                total_income = COALESCE($2, total_income), \
                total_expenses = COALESCE($3, total_expenses), \
                date = COALESCE($4, date), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.total_income)
        .bind(changes.total_expenses)
        .bind(changes.date)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error updating balance");
            AppError::Database("Failed to update balance".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Balance".to_string()))?;

        Ok(record.into())
    }

    /// Soft-delete a balance, filing a snapshot in the trash ledger
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Error deleting balance");
            AppError::Database("Failed to delete balance".to_string())
        })?;

        let record = sqlx::query_as::<_, BalanceRecord>(&format!(
            "SELECT {COLUMNS} FROM balances WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Error deleting balance");
            AppError::Database("Failed to delete balance".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Balance".to_string()))?;

        let snapshot = serde_json::to_value(Balance::from(record)).map_err(|e| {
            error!(error = %e, "Error deleting balance");
            AppError::Database("Failed to delete balance".to_string())
        })?;
        file_snapshot(&mut tx, "balances", id, snapshot).await?;

        sqlx::query("UPDATE balances SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, "Error deleting balance");
                AppError::Database("Failed to delete balance".to_string())
            })?;

        tx.commit().await.map_err(|e| {
            error!(error = %e, "Error deleting balance");
            AppError::Database("Failed to delete balance".to_string())
        })?;

        Ok(())
    }
}
