//! Concert service - concert catalog management and the admin cancel
//! cascade.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    CancelOutcome, Concert, ConcertStatus, ConcertWithReservation, CreateConcert, NewTransaction,
    TransactionAction, UpdateConcert,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Concert service trait for dependency injection.
#[async_trait]
pub trait ConcertService: Send + Sync {
    /// Create a new concert (admin)
    async fn create(&self, input: CreateConcert) -> AppResult<Concert>;

    /// Paginated catalog of non-deleted concerts, each annotated with the
    /// calling user's reservation on it when one exists
    async fn find_all(
        &self,
        params: PaginationParams,
        user_id: Option<Uuid>,
    ) -> AppResult<Paginated<ConcertWithReservation>>;

    /// Fetch a single concert by id
    async fn find_one(&self, id: Uuid) -> AppResult<Concert>;

    /// Update name, description or capacity
    async fn update(&self, id: Uuid, input: UpdateConcert) -> AppResult<Concert>;

    /// Cancel a concert and cascade over its reservations
    async fn cancel(&self, id: Uuid) -> AppResult<CancelOutcome>;

    /// Hard-delete a concert row
    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ConcertService using Unit of Work.
pub struct ConcertManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ConcertManager<U> {
    /// Create new concert service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ConcertService for ConcertManager<U> {
    async fn create(&self, input: CreateConcert) -> AppResult<Concert> {
        if input.max_seats < crate::config::MIN_CONCERT_SEATS {
            return Err(AppError::validation("maxSeats must be at least 1"));
        }

        let concert = self.uow.concerts().create(input.into_concert()).await?;

        tracing::info!(concert_id = %concert.id, name = %concert.name, "Concert created");
        Ok(concert)
    }

    async fn find_all(
        &self,
        params: PaginationParams,
        user_id: Option<Uuid>,
    ) -> AppResult<Paginated<ConcertWithReservation>> {
        let (concerts, total) = self
            .uow
            .concerts()
            .list_active_paginated(params.offset(), params.limit())
            .await?;

        // Annotate each concert with the caller's own reservation so the
        // catalog can show "reserved by you" state in one round trip
        let mine: HashMap<Uuid, (Uuid, crate::domain::ReservationStatus)> = match user_id {
            Some(user_id) => self
                .uow
                .reservations()
                .list_for_user(user_id)
                .await?
                .into_iter()
                .map(|r| (r.concert_id, (r.id, r.status)))
                .collect(),
            None => HashMap::new(),
        };

        let items = concerts
            .into_iter()
            .map(|concert| {
                let held = mine.get(&concert.id);
                ConcertWithReservation {
                    reservation_id: held.map(|(id, _)| *id),
                    reservation_status: held.map(|(_, status)| *status),
                    concert,
                }
            })
            .collect();

        Ok(Paginated::from_params(items, &params, total))
    }

    async fn find_one(&self, id: Uuid) -> AppResult<Concert> {
        self.uow
            .concerts()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Concert not found"))
    }

    async fn update(&self, id: Uuid, input: UpdateConcert) -> AppResult<Concert> {
        if let Some(max_seats) = input.max_seats {
            if max_seats < crate::config::MIN_CONCERT_SEATS {
                return Err(AppError::validation("maxSeats must be at least 1"));
            }
        }

        self.uow
            .concerts()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Concert not found"))?;

        self.uow.concerts().update(id, input).await
    }

    async fn cancel(&self, id: Uuid) -> AppResult<CancelOutcome> {
        let concert = self
            .uow
            .concerts()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Concert not found"))?;

        if concert.deleted || concert.status == ConcertStatus::Canceled {
            return Err(AppError::invalid_state("This concert has been cancelled"));
        }

        // Audit first: one DELETED_BY_ADMIN entry per reservation the
        // concert ever had, whatever its current status
        let reservations = self.uow.reservations().list_for_concert(id).await?;

        let user_ids: Vec<Uuid> = reservations.iter().map(|r| r.user_id).collect();
        let user_names: HashMap<Uuid, String> = self
            .uow
            .users()
            .find_by_ids(user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        for reservation in &reservations {
            let username = user_names
                .get(&reservation.user_id)
                .cloned()
                .unwrap_or_default();
            self.uow
                .transactions()
                .create(NewTransaction {
                    reservation_id: reservation.id,
                    user_id: reservation.user_id,
                    username,
                    concert_name: concert.name.clone(),
                    action: TransactionAction::DeletedByAdmin,
                })
                .await?;
        }

        let mutated = self
            .uow
            .reservations()
            .cancel_confirmed_for_concert(id)
            .await?;

        let concert = self
            .uow
            .concerts()
            .mark_cancelled(id, ConcertStatus::Canceled)
            .await?;

        tracing::info!(
            concert_id = %id,
            audited = reservations.len(),
            mutated,
            "Concert cancelled"
        );

        // The reported count is the audited set, not the subset that was
        // actually flipped from CONFIRMED
        Ok(CancelOutcome {
            concert,
            reservations_updated_count: reservations.len() as u64,
        })
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.uow
            .concerts()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Concert not found"))?;

        self.uow.concerts().delete(id).await?;

        tracing::info!(concert_id = %id, "Concert deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReservationStatus;
    use crate::infra::{
        MockConcertRepository, MockReservationRepository, MockTransactionRepository,
        MockUserRepository,
    };
    use crate::services::test_support::{concert, reservation, user, MockUow};
    use mockall::predicate::eq;

    fn mocks() -> (
        MockUserRepository,
        MockConcertRepository,
        MockReservationRepository,
        MockTransactionRepository,
    ) {
        (
            MockUserRepository::new(),
            MockConcertRepository::new(),
            MockReservationRepository::new(),
            MockTransactionRepository::new(),
        )
    }

    fn make_transaction(record: NewTransaction) -> AppResult<crate::domain::Transaction> {
        Ok(crate::domain::Transaction {
            id: Uuid::new_v4(),
            reservation_id: record.reservation_id,
            user_id: record.user_id,
            username: record.username,
            concert_name: record.concert_name,
            action: record.action,
            created_at: chrono::Utc::now(),
        })
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let (users, mut concerts, reservations, transactions) = mocks();
        concerts.expect_create().returning(Ok);

        let uow = MockUow::new(users, concerts, reservations, transactions);
        let service = ConcertManager::new(Arc::new(uow));

        let created = service
            .create(CreateConcert {
                name: "Summer Jam".to_string(),
                description: Some("Open air".to_string()),
                max_seats: 500,
            })
            .await
            .unwrap();

        assert_eq!(created.status, ConcertStatus::Available);
        assert!(!created.deleted);
        assert_eq!(created.max_seats, 500);
    }

    #[tokio::test]
    async fn create_rejects_zero_capacity() {
        let (users, concerts, reservations, transactions) = mocks();
        let uow = MockUow::new(users, concerts, reservations, transactions);
        let service = ConcertManager::new(Arc::new(uow));

        let err = service
            .create(CreateConcert {
                name: "Empty".to_string(),
                description: None,
                max_seats: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn find_all_annotates_callers_reservations() {
        let (users, mut concerts, mut reservations, transactions) = mocks();
        let user_id = Uuid::new_v4();
        let reserved_concert = concert(Uuid::new_v4(), 100);
        let open_concert = concert(Uuid::new_v4(), 50);
        let reserved_id = reserved_concert.id;

        let listing = vec![reserved_concert.clone(), open_concert.clone()];
        concerts
            .expect_list_active_paginated()
            .returning(move |_, _| Ok((listing.clone(), 2)));
        reservations
            .expect_list_for_user()
            .with(eq(user_id))
            .returning(move |u| {
                Ok(vec![reservation(u, reserved_id, ReservationStatus::Confirmed)])
            });

        let uow = MockUow::new(users, concerts, reservations, transactions);
        let service = ConcertManager::new(Arc::new(uow));

        let page = service
            .find_all(PaginationParams::new(1, 10), Some(user_id))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2);
        let annotated = page
            .data
            .iter()
            .find(|c| c.concert.id == reserved_id)
            .unwrap();
        assert!(annotated.reservation_id.is_some());
        assert_eq!(
            annotated.reservation_status,
            Some(ReservationStatus::Confirmed)
        );
        let bare = page
            .data
            .iter()
            .find(|c| c.concert.id == open_concert.id)
            .unwrap();
        assert!(bare.reservation_id.is_none());
    }

    #[tokio::test]
    async fn cancel_cascade_audits_all_and_mutates_confirmed_only() {
        let (mut users, mut concerts, mut reservations, mut transactions) = mocks();
        let concert_id = Uuid::new_v4();

        let confirmed = reservation(Uuid::new_v4(), concert_id, ReservationStatus::Confirmed);
        let cancelled = reservation(Uuid::new_v4(), concert_id, ReservationStatus::Cancelled);
        let rows = vec![confirmed, cancelled];

        concerts
            .expect_find_by_id()
            .with(eq(concert_id))
            .returning(|id| Ok(Some(concert(id, 10))));
        reservations
            .expect_list_for_concert()
            .with(eq(concert_id))
            .returning(move |_| Ok(rows.clone()));
        users
            .expect_find_by_ids()
            .returning(|ids| Ok(ids.into_iter().map(user).collect()));
        // Every loaded reservation is audited, including already-cancelled ones
        transactions
            .expect_create()
            .withf(|record| record.action == TransactionAction::DeletedByAdmin)
            .times(2)
            .returning(make_transaction);
        // Only the confirmed one is flipped
        reservations
            .expect_cancel_confirmed_for_concert()
            .with(eq(concert_id))
            .times(1)
            .returning(|_| Ok(1));
        concerts
            .expect_mark_cancelled()
            .with(eq(concert_id), eq(ConcertStatus::Canceled))
            .returning(|id, status| {
                let mut c = concert(id, 10);
                c.status = status;
                c.deleted = true;
                Ok(c)
            });

        let uow = MockUow::new(users, concerts, reservations, transactions);
        let service = ConcertManager::new(Arc::new(uow));

        let outcome = service.cancel(concert_id).await.unwrap();
        assert_eq!(outcome.concert.status, ConcertStatus::Canceled);
        assert!(outcome.concert.deleted);
        assert_eq!(outcome.reservations_updated_count, 2);
    }

    #[tokio::test]
    async fn cascade_counts_audited_not_mutated() {
        let (mut users, mut concerts, mut reservations, mut transactions) = mocks();
        let concert_id = Uuid::new_v4();

        // Three reservations on record, none of them still confirmed
        let rows: Vec<_> = (0..3)
            .map(|_| reservation(Uuid::new_v4(), concert_id, ReservationStatus::Cancelled))
            .collect();

        concerts
            .expect_find_by_id()
            .returning(|id| Ok(Some(concert(id, 10))));
        reservations
            .expect_list_for_concert()
            .returning(move |_| Ok(rows.clone()));
        users
            .expect_find_by_ids()
            .returning(|ids| Ok(ids.into_iter().map(user).collect()));
        transactions
            .expect_create()
            .times(3)
            .returning(make_transaction);
        reservations
            .expect_cancel_confirmed_for_concert()
            .returning(|_| Ok(0));
        concerts.expect_mark_cancelled().returning(|id, status| {
            let mut c = concert(id, 10);
            c.status = status;
            c.deleted = true;
            Ok(c)
        });

        let uow = MockUow::new(users, concerts, reservations, transactions);
        let service = ConcertManager::new(Arc::new(uow));

        let outcome = service.cancel(concert_id).await.unwrap();
        assert_eq!(outcome.reservations_updated_count, 3);
    }

    #[tokio::test]
    async fn cancel_twice_rejected() {
        let (users, mut concerts, reservations, transactions) = mocks();

        concerts.expect_find_by_id().returning(|id| {
            let mut c = concert(id, 10);
            c.status = ConcertStatus::Canceled;
            c.deleted = true;
            Ok(Some(c))
        });

        let uow = MockUow::new(users, concerts, reservations, transactions);
        let service = ConcertManager::new(Arc::new(uow));

        let err = service.cancel(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(msg) if msg == "This concert has been cancelled"));
    }

    #[tokio::test]
    async fn cancel_unknown_concert_rejected() {
        let (users, mut concerts, reservations, transactions) = mocks();
        concerts.expect_find_by_id().returning(|_| Ok(None));

        let uow = MockUow::new(users, concerts, reservations, transactions);
        let service = ConcertManager::new(Arc::new(uow));

        let err = service.cancel(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Concert not found"));
    }

    #[tokio::test]
    async fn remove_unknown_concert_rejected() {
        let (users, mut concerts, reservations, transactions) = mocks();
        concerts.expect_find_by_id().returning(|_| Ok(None));

        let uow = MockUow::new(users, concerts, reservations, transactions);
        let service = ConcertManager::new(Arc::new(uow));

        let err = service.remove(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
