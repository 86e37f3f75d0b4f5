//! Trash ledger
//!
//! Every soft delete files a JSON snapshot of the deleted row here, inside
//! the same transaction that sets `deleted_at` on the source table.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use finledger_core::model::TrashEntry;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
struct TrashRecord {
    id: Uuid,
    table_name: String,
    record_id: Uuid,
    data: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<TrashRecord> for TrashEntry {
    fn from(rec: TrashRecord) -> Self {
        TrashEntry {
            id: rec.id,
            table_name: rec.table_name,
            record_id: rec.record_id,
            data: rec.data,
            created_at: rec.created_at,
        }
    }
}

/// File a snapshot of a soft-deleted record into the trash ledger
///
/// Runs inside the caller's transaction so the snapshot and the
/// `deleted_at` update commit or roll back together.
pub(crate) async fn file_snapshot(
    tx: &mut Transaction<'_, Postgres>,
    table_name: &str,
    record_id: Uuid,
    data: serde_json::Value,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO trash (id, table_name, record_id, data, created_at) \
         VALUES ($1, $2, $3, $4, NOW())",
    )
    .bind(Uuid::new_v4())
    .bind(table_name)
    .bind(record_id)
    .bind(data)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        error!(error = %e, table_name, %record_id, "Error filing trash snapshot");
        AppError::Database("Failed to record deletion".to_string())
    })?;

    Ok(())
}

/// Read access to the trash ledger
pub struct TrashService {
    db: PgPool,
}

impl TrashService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Most recent trash entries, newest first
    pub async fn list(&self, limit: i64) -> Result<Vec<TrashEntry>, AppError> {
        let records = sqlx::query_as::<_, TrashRecord>(
            "SELECT id, table_name, record_id, data, created_at FROM trash \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Error listing trash");
            AppError::Database("Failed to list trash".to_string())
        })?;

        Ok(records.into_iter().map(TrashEntry::from).collect())
    }
}
