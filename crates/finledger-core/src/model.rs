//! Ledger domain models
//!
//! These map to the PostgreSQL tables. All entities are soft-deletable:
//! deletion sets `deleted_at` and files a JSON snapshot of the row into the
//! `trash` ledger, so reads always filter `deleted_at IS NULL`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Classification for an income or expense entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Recurring entry (salary, rent)
    Fixed,
    /// One-off entry
    Variable,
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Fixed => "fixed",
            EntryKind::Variable => "variable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Some(EntryKind::Fixed),
            "variable" => Some(EntryKind::Variable),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address (unique, used for login)
    pub email: String,

    /// Argon2id password hash, never serialized in API responses
    #[serde(skip_serializing, default)]
    #[schema(write_only)]
    pub password_hash: String,

    /// Role claim embedded in issued tokens ("user", "admin")
    pub role: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Income record for a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Income {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub kind: EntryKind,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Expense record for a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub kind: EntryKind,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Point-in-time balance summary for a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Balance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_income: f64,
    pub total_expenses: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    /// Net amount (income minus expenses)
    pub fn net(&self) -> f64 {
        self.total_income - self.total_expenses
    }
}

/// Snapshot of a soft-deleted record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrashEntry {
    pub id: Uuid,
    /// Source table the record was deleted from
    pub table_name: String,
    /// Primary key of the deleted record
    pub record_id: Uuid,
    /// Full JSON snapshot of the record at deletion time
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_conversion() {
        assert_eq!(EntryKind::Fixed.as_str(), "fixed");
        assert_eq!(EntryKind::Variable.as_str(), "variable");

        assert_eq!(EntryKind::parse("fixed"), Some(EntryKind::Fixed));
        assert_eq!(EntryKind::parse("VARIABLE"), Some(EntryKind::Variable));
        assert_eq!(EntryKind::parse("other"), None);
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "secret_hash".to_string(),
            role: "user".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret_hash"));
        assert!(json.contains("test@example.com"));
    }

    #[test]
    fn test_balance_net() {
        let balance = Balance {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            total_income: 2500.0,
            total_expenses: 1800.5,
            date: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!((balance.net() - 699.5).abs() < f64::EPSILON);
    }
}
