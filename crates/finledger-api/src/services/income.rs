//! Income service
//!
//! Thin delegation to PostgreSQL: create, fetch, update, soft delete.
//! Database failures are logged with their cause and surfaced as a generic
//! per-operation error.

use super::trash::file_snapshot;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use finledger_core::model::{EntryKind, Income};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

/// New income request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewIncome {
    pub user_id: Uuid,
    pub amount: f64,
    pub kind: EntryKind,
    pub date: DateTime<Utc>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Partial income update; unset fields keep their current values
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct IncomeUpdate {
    pub amount: Option<f64>,
    pub kind: Option<EntryKind>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct IncomeRecord {
    id: Uuid,
    user_id: Uuid,
    amount: f64,
    kind: String,
    date: DateTime<Utc>,
    category: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IncomeRecord {
    fn try_into_model(self) -> Result<Income, AppError> {
        let kind = EntryKind::parse(&self.kind).ok_or_else(|| {
            error!(kind = %self.kind, id = %self.id, "Unknown income kind in database");
            AppError::Database("Failed to load income".to_string())
        })?;

        Ok(Income {
            id: self.id,
            user_id: self.user_id,
            amount: self.amount,
            kind,
            date: self.date,
            category: self.category,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const COLUMNS: &str =
    "id, user_id, amount, kind, date, category, description, created_at, updated_at";

pub struct IncomeService {
    db: PgPool,
}

impl IncomeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a new income
    pub async fn create(&self, input: NewIncome) -> Result<Income, AppError> {
        let record = sqlx::query_as::<_, IncomeRecord>(&format!(
            "INSERT INTO incomes (id, user_id, amount, kind, date, category, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW()) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(input.amount)
        .bind(input.kind.as_str())
        .bind(input.date)
        .bind(&input.category)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error creating income");
            AppError::Database("Failed to create income".to_string())
        })?;

        record.try_into_model()
    }

    /// Fetch an income by id; soft-deleted rows are invisible
    pub async fn get(&self, id: Uuid) -> Result<Income, AppError> {
        let record = sqlx::query_as::<_, IncomeRecord>(&format!(
            "SELECT {COLUMNS} FROM incomes WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error retrieving income");
            AppError::Database("Failed to retrieve income".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Income".to_string()))?;

        record.try_into_model()
    }

    /// Apply a partial update to an existing income
    pub async fn update(&self, id: Uuid, changes: IncomeUpdate) -> Result<Income, AppError> {
        let record = sqlx::query_as::<_, IncomeRecord>(&format!(
            "UPDATE incomes SET \
                amount = COALESCE($2, amount), \
                kind = COALESCE($3, kind), \
                date = COALESCE($4, date), \
                category = COALESCE($5, category), \
                description = COALESCE($6, description), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.amount)
        .bind(changes.kind.map(|k| k.as_str().to_string()))
        .bind(changes.date)
        .bind(&changes.category)
        .bind(&changes.description)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error updating income");
            AppError::Database("Failed to update income".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Income".to_string()))?;

        record.try_into_model()
    }

    /// Soft-delete an income, filing a snapshot in the trash ledger
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Error deleting income");
            AppError::Database("Failed to delete income".to_string())
        })?;

        let record = sqlx::query_as::<_, IncomeRecord>(&format!(
            "SELECT {COLUMNS} FROM incomes WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Error deleting income");
            AppError::Database("Failed to delete income".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Income".to_string()))?;

        let snapshot = serde_json::to_value(record.try_into_model()?)
            .map_err(|e| {
                error!(error = %e, "Error deleting income");
                AppError::Database("Failed to delete income".to_string())
            })?;
        file_snapshot(&mut tx, "incomes", id, snapshot).await?;

        sqlx::query("UPDATE incomes SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, "Error deleting income");
                AppError::Database("Failed to delete income".to_string())
            })?;

        tx.commit().await.map_err(|e| {
            error!(error = %e, "Error deleting income");
            AppError::Database("Failed to delete income".to_string())
        })?;

        Ok(())
    }
}
