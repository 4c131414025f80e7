//! Reservation repository - reservation rows and bulk status updates.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::reservation::{self, Entity as ReservationEntity};
use crate::domain::{Reservation, ReservationStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Reservation repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a fully-constructed reservation record
    async fn create(&self, reservation: Reservation) -> AppResult<Reservation>;

    /// The single reservation for a (user, concert) pair, if any
    async fn find_by_user_and_concert(
        &self,
        user_id: Uuid,
        concert_id: Uuid,
    ) -> AppResult<Option<Reservation>>;

    /// Count reservations for a concert whose status is not CANCELLED.
    /// This count is the sole capacity-accounting mechanism.
    async fn count_active_for_concert(&self, concert_id: Uuid) -> AppResult<u64>;

    /// All reservations belonging to a user
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Reservation>>;

    /// All reservations referencing a concert, regardless of status
    async fn list_for_concert(&self, concert_id: Uuid) -> AppResult<Vec<Reservation>>;

    /// Page through all reservations, returning rows plus total count
    async fn list_paginated(&self, offset: u64, limit: u64) -> AppResult<(Vec<Reservation>, u64)>;

    /// Transition a reservation to the given status
    async fn set_status(&self, id: Uuid, status: ReservationStatus) -> AppResult<Reservation>;

    /// Bulk-cancel a concert's CONFIRMED reservations, marking them deleted.
    /// Returns the number of rows actually mutated.
    async fn cancel_confirmed_for_concert(&self, concert_id: Uuid) -> AppResult<u64>;

    /// Count reservations with the given status
    async fn count_with_status(&self, status: ReservationStatus) -> AppResult<u64>;

    /// Count user-initiated cancellations (CANCELLED and not deleted;
    /// cascade-cancelled rows are excluded)
    async fn count_cancelled_not_deleted(&self) -> AppResult<u64>;
}

/// SeaORM-backed reservation repository
pub struct ReservationStore {
    db: DatabaseConnection,
}

impl ReservationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReservationRepository for ReservationStore {
    async fn create(&self, res: Reservation) -> AppResult<Reservation> {
        let active_model = reservation::ActiveModel {
            id: Set(res.id),
            user_id: Set(res.user_id),
            concert_id: Set(res.concert_id),
            reserved_at: Set(res.reserved_at),
            status: Set(res.status.as_str().to_string()),
            deleted: Set(res.deleted),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Reservation::from(model))
    }

    async fn find_by_user_and_concert(
        &self,
        user_id: Uuid,
        concert_id: Uuid,
    ) -> AppResult<Option<Reservation>> {
        let result = ReservationEntity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .filter(reservation::Column::ConcertId.eq(concert_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Reservation::from))
    }

    async fn count_active_for_concert(&self, concert_id: Uuid) -> AppResult<u64> {
        ReservationEntity::find()
            .filter(reservation::Column::ConcertId.eq(concert_id))
            .filter(reservation::Column::Status.ne(ReservationStatus::Cancelled.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Reservation>> {
        let models = ReservationEntity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Reservation::from).collect())
    }

    async fn list_for_concert(&self, concert_id: Uuid) -> AppResult<Vec<Reservation>> {
        let models = ReservationEntity::find()
            .filter(reservation::Column::ConcertId.eq(concert_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Reservation::from).collect())
    }

    async fn list_paginated(&self, offset: u64, limit: u64) -> AppResult<(Vec<Reservation>, u64)> {
        let total = ReservationEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = ReservationEntity::find()
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Reservation::from).collect(), total))
    }

    async fn set_status(&self, id: Uuid, status: ReservationStatus) -> AppResult<Reservation> {
        let model = ReservationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;

        let mut active: reservation::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Reservation::from(model))
    }

    async fn cancel_confirmed_for_concert(&self, concert_id: Uuid) -> AppResult<u64> {
        let result = ReservationEntity::update_many()
            .col_expr(
                reservation::Column::Status,
                Expr::value(ReservationStatus::Cancelled.as_str()),
            )
            .col_expr(reservation::Column::Deleted, Expr::value(true))
            .filter(reservation::Column::ConcertId.eq(concert_id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed.as_str()))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    async fn count_with_status(&self, status: ReservationStatus) -> AppResult<u64> {
        ReservationEntity::find()
            .filter(reservation::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_cancelled_not_deleted(&self) -> AppResult<u64> {
        ReservationEntity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Cancelled.as_str()))
            .filter(reservation::Column::Deleted.eq(false))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
