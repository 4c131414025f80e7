//! Concert domain entity and its status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::reservation::ReservationStatus;

/// Concert status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcertStatus {
    Available,
    Canceled,
}

impl ConcertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConcertStatus::Available => "AVAILABLE",
            ConcertStatus::Canceled => "CANCELED",
        }
    }
}

impl From<&str> for ConcertStatus {
    fn from(s: &str) -> Self {
        match s {
            "CANCELED" => ConcertStatus::Canceled,
            _ => ConcertStatus::Available,
        }
    }
}

impl std::fmt::Display for ConcertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Concert domain entity
///
/// Once `status` is CANCELED or `deleted` is set, no new reservation
/// may be created against the concert.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Concert {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub max_seats: i32,
    pub status: ConcertStatus,
    /// Soft delete flag, set by the cancellation cascade
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Concert creation data; defaults are filled here, not by the storage layer
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateConcert {
    #[schema(example = "Midnight Symphony")]
    pub name: String,
    #[schema(example = "An open-air orchestral night")]
    pub description: Option<String>,
    #[schema(example = 200, minimum = 1)]
    pub max_seats: i32,
}

impl CreateConcert {
    /// Build a full concert record with deterministic defaults
    pub fn into_concert(self) -> Concert {
        let now = Utc::now();
        Concert {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            max_seats: self.max_seats,
            status: ConcertStatus::Available,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Concert update data transfer object
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateConcert {
    pub name: Option<String>,
    pub description: Option<String>,
    pub max_seats: Option<i32>,
}

/// Concert annotated with the requesting user's reservation, if any
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConcertWithReservation {
    #[serde(flatten)]
    pub concert: Concert,
    pub reservation_id: Option<Uuid>,
    pub reservation_status: Option<ReservationStatus>,
}

/// Result of the concert cancellation cascade.
///
/// `reservations_updated_count` is the number of reservations touched by
/// the audit pass, which can exceed the number actually transitioned when
/// some were already cancelled.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CancelOutcome {
    pub concert: Concert,
    pub reservations_updated_count: u64,
}
