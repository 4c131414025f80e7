//! Transaction audit record.
//!
//! Append-only ledger of reservation lifecycle events. Username and concert
//! name are denormalized snapshots taken at write time so the ledger stays
//! readable even if the referenced records are later altered or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Reservation lifecycle event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionAction {
    Confirmed,
    Cancelled,
    DeletedByAdmin,
}

impl TransactionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionAction::Confirmed => "CONFIRMED",
            TransactionAction::Cancelled => "CANCELLED",
            TransactionAction::DeletedByAdmin => "DELETED_BY_ADMIN",
        }
    }
}

impl From<&str> for TransactionAction {
    fn from(s: &str) -> Self {
        match s {
            "CANCELLED" => TransactionAction::Cancelled,
            "DELETED_BY_ADMIN" => TransactionAction::DeletedByAdmin,
            _ => TransactionAction::Confirmed,
        }
    }
}

impl std::fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction domain entity (never mutated after creation)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    /// User display name snapshot at event time
    pub username: String,
    /// Concert name snapshot at event time
    pub concert_name: String,
    pub action: TransactionAction,
    pub created_at: DateTime<Utc>,
}

/// Data for a new ledger entry
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub concert_name: String,
    pub action: TransactionAction,
}
