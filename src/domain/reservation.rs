//! Reservation domain entity, enriched read models and dashboard stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::concert::Concert;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
        }
    }
}

impl From<&str> for ReservationStatus {
    fn from(s: &str) -> Self {
        match s {
            "CANCELLED" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Confirmed,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reservation domain entity
///
/// At most one non-cancelled reservation per (user, concert) pair exists;
/// the reservation engine enforces this, not the storage layer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub concert_id: Uuid,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
    /// Set when the reservation was cancelled by a concert cancellation
    /// cascade rather than by the user
    pub deleted: bool,
}

impl Reservation {
    /// Build a new confirmed reservation with deterministic defaults
    pub fn new(user_id: Uuid, concert_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            concert_id,
            reserved_at: Utc::now(),
            status: ReservationStatus::Confirmed,
            deleted: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }
}

/// Reservation enriched with full concert detail (user-facing list)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationWithConcert {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub concert: Option<Concert>,
}

/// Reservation enriched with display names (admin-facing list)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationListItem {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub user_name: Option<String>,
    pub concert_name: Option<String>,
}

/// Aggregate metrics for the admin dashboard.
///
/// `cancelled_count` counts user-initiated cancellations only; reservations
/// cancelled by a concert cancellation cascade carry `deleted = true` and
/// are excluded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_seats: i64,
    pub reserved_count: u64,
    pub cancelled_count: u64,
}
