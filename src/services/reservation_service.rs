//! Reservation service - the seat reservation engine.
//!
//! Mediates seat reservation and cancellation, enforcing the concert
//! capacity limit and the one-active-reservation-per-user rule, and
//! appending an audit transaction for every lifecycle event.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    DashboardStats, NewTransaction, Reservation, ReservationListItem, ReservationStatus,
    ReservationWithConcert, TransactionAction,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Reservation service trait for dependency injection.
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Reserve a seat for a user on a concert
    async fn reserve_seat(&self, user_id: Uuid, concert_id: Uuid) -> AppResult<Reservation>;

    /// Cancel a user's reservation on a concert
    async fn cancel_reserve(&self, user_id: Uuid, concert_id: Uuid) -> AppResult<Reservation>;

    /// All reservations of one user, each with full concert detail
    async fn get_user_reservations(&self, user_id: Uuid)
        -> AppResult<Vec<ReservationWithConcert>>;

    /// Paginated global reservation list with display names (admin view)
    async fn get_list_reservation(
        &self,
        params: PaginationParams,
    ) -> AppResult<Paginated<ReservationListItem>>;

    /// Aggregate metrics for the admin dashboard
    async fn get_dashboard_stats(&self) -> AppResult<DashboardStats>;
}

/// Concrete implementation of ReservationService using Unit of Work.
pub struct ReservationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReservationManager<U> {
    /// Create new reservation service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ReservationService for ReservationManager<U> {
    async fn reserve_seat(&self, user_id: Uuid, concert_id: Uuid) -> AppResult<Reservation> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let concert = self
            .uow
            .concerts()
            .find_by_id(concert_id)
            .await?
            .ok_or_else(|| AppError::not_found("Concert not found"))?;

        if concert.deleted || concert.status == crate::domain::ConcertStatus::Canceled {
            return Err(AppError::invalid_state("This concert has been cancelled"));
        }

        let reserved = self
            .uow
            .reservations()
            .count_active_for_concert(concert_id)
            .await?;

        let capacity = u64::try_from(concert.max_seats).unwrap_or(0);
        if reserved >= capacity {
            return Err(AppError::CapacityExceeded("No seats available".to_string()));
        }

        if let Some(existing) = self
            .uow
            .reservations()
            .find_by_user_and_concert(user_id, concert_id)
            .await?
        {
            // Re-reservation after cancellation is disallowed by policy
            return Err(match existing.status {
                ReservationStatus::Cancelled => {
                    AppError::conflict("Cannot reserve again after previous cancellation")
                }
                ReservationStatus::Confirmed => {
                    AppError::conflict("User already has a reservation")
                }
            });
        }

        // The capacity count above and this insert are separate statements;
        // two concurrent calls near the limit can both pass the count check.
        let reservation = self
            .uow
            .reservations()
            .create(Reservation::new(user_id, concert_id))
            .await?;

        self.uow
            .transactions()
            .create(NewTransaction {
                reservation_id: reservation.id,
                user_id,
                username: user.name,
                concert_name: concert.name,
                action: TransactionAction::Confirmed,
            })
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            user_id = %user_id,
            concert_id = %concert_id,
            "Seat reserved"
        );

        Ok(reservation)
    }

    async fn cancel_reserve(&self, user_id: Uuid, concert_id: Uuid) -> AppResult<Reservation> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let concert = self
            .uow
            .concerts()
            .find_by_id(concert_id)
            .await?
            .ok_or_else(|| AppError::not_found("Concert not found"))?;

        let reservation = self
            .uow
            .reservations()
            .find_by_user_and_concert(user_id, concert_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;

        if reservation.is_cancelled() {
            return Err(AppError::invalid_state("Reservation already cancelled"));
        }

        let updated = self
            .uow
            .reservations()
            .set_status(reservation.id, ReservationStatus::Cancelled)
            .await?;

        self.uow
            .transactions()
            .create(NewTransaction {
                reservation_id: updated.id,
                user_id,
                username: user.name,
                concert_name: concert.name,
                action: TransactionAction::Cancelled,
            })
            .await?;

        tracing::info!(
            reservation_id = %updated.id,
            user_id = %user_id,
            concert_id = %concert_id,
            "Reservation cancelled"
        );

        Ok(updated)
    }

    async fn get_user_reservations(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<ReservationWithConcert>> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let reservations = self.uow.reservations().list_for_user(user_id).await?;

        let concert_ids: Vec<Uuid> = reservations.iter().map(|r| r.concert_id).collect();
        let concerts: HashMap<Uuid, _> = self
            .uow
            .concerts()
            .find_by_ids(concert_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(reservations
            .into_iter()
            .map(|reservation| {
                let concert = concerts.get(&reservation.concert_id).cloned();
                ReservationWithConcert {
                    reservation,
                    concert,
                }
            })
            .collect())
    }

    async fn get_list_reservation(
        &self,
        params: PaginationParams,
    ) -> AppResult<Paginated<ReservationListItem>> {
        let (reservations, total) = self
            .uow
            .reservations()
            .list_paginated(params.offset(), params.limit())
            .await?;

        let user_ids: Vec<Uuid> = reservations.iter().map(|r| r.user_id).collect();
        let concert_ids: Vec<Uuid> = reservations.iter().map(|r| r.concert_id).collect();

        let user_names: HashMap<Uuid, String> = self
            .uow
            .users()
            .find_by_ids(user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let concert_names: HashMap<Uuid, String> = self
            .uow
            .concerts()
            .find_by_ids(concert_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let items = reservations
            .into_iter()
            .map(|reservation| ReservationListItem {
                user_name: user_names.get(&reservation.user_id).cloned(),
                concert_name: concert_names.get(&reservation.concert_id).cloned(),
                reservation,
            })
            .collect();

        Ok(Paginated::from_params(items, &params, total))
    }

    async fn get_dashboard_stats(&self) -> AppResult<DashboardStats> {
        let total_seats = self.uow.concerts().sum_seats_not_cancelled().await?;

        let reserved_count = self
            .uow
            .reservations()
            .count_with_status(ReservationStatus::Confirmed)
            .await?;

        // Cascade-cancelled reservations (deleted = true) are an
        // administrative removal, not a user cancellation
        let cancelled_count = self
            .uow
            .reservations()
            .count_cancelled_not_deleted()
            .await?;

        Ok(DashboardStats {
            total_seats,
            reserved_count,
            cancelled_count,
        })
    }
}
