//! End-to-end reservation flow tests.
//!
//! Runs the real services against an in-memory persistence layer so the
//! full reserve / cancel / cascade / ledger behavior can be exercised
//! without a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use concert_api::domain::{
    Concert, ConcertStatus, CreateConcert, NewTransaction, Reservation, ReservationStatus,
    Transaction, TransactionAction, UpdateConcert, User, UserRole,
};
use concert_api::errors::{AppError, AppResult};
use concert_api::infra::{
    ConcertRepository, ReservationRepository, TransactionRepository, UnitOfWork, UserRepository,
};
use concert_api::services::{
    ConcertManager, ConcertService, ReservationManager, ReservationService, TransactionLedger,
    TransactionService,
};
use concert_api::types::PaginationParams;

// =============================================================================
// In-memory persistence
// =============================================================================

#[derive(Default)]
struct Inner {
    users: Mutex<Vec<User>>,
    concerts: Mutex<Vec<Concert>>,
    reservations: Mutex<Vec<Reservation>>,
    transactions: Mutex<Vec<Transaction>>,
}

/// Whole persistence layer in one struct: it implements every repository
/// trait plus UnitOfWork, handing out clones of itself.
#[derive(Clone, Default)]
struct InMemory(Arc<Inner>);

impl InMemory {
    fn seed_user(&self, name: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "hashed".to_string(),
            name: name.to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.0.users.lock().unwrap().push(user.clone());
        user
    }

    fn seed_concert(&self, name: &str, max_seats: i32) -> Concert {
        let concert = CreateConcert {
            name: name.to_string(),
            description: None,
            max_seats,
        }
        .into_concert();
        self.0.concerts.lock().unwrap().push(concert.clone());
        concert
    }
}

#[async_trait]
impl UserRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.0.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        name: String,
        role: String,
    ) -> AppResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            role: UserRole::from(role.as_str()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.0.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.0.users.lock().unwrap().clone())
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        role: Option<String>,
    ) -> AppResult<User> {
        let mut users = self.0.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(role) = role {
            user.role = UserRole::from(role.as_str());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.0.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl ConcertRepository for InMemory {
    async fn create(&self, concert: Concert) -> AppResult<Concert> {
        self.0.concerts.lock().unwrap().push(concert.clone());
        Ok(concert)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Concert>> {
        Ok(self
            .0
            .concerts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Concert>> {
        Ok(self
            .0
            .concerts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn list_active_paginated(
        &self,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Concert>, u64)> {
        let concerts = self.0.concerts.lock().unwrap();
        let active: Vec<Concert> = concerts.iter().filter(|c| !c.deleted).cloned().collect();
        let total = active.len() as u64;
        let page = active
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn sum_seats_not_cancelled(&self) -> AppResult<i64> {
        Ok(self
            .0
            .concerts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.status != ConcertStatus::Canceled)
            .map(|c| i64::from(c.max_seats))
            .sum())
    }

    async fn update(&self, id: Uuid, dto: UpdateConcert) -> AppResult<Concert> {
        let mut concerts = self.0.concerts.lock().unwrap();
        let concert = concerts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Concert not found"))?;
        if let Some(name) = dto.name {
            concert.name = name;
        }
        if let Some(description) = dto.description {
            concert.description = Some(description);
        }
        if let Some(max_seats) = dto.max_seats {
            concert.max_seats = max_seats;
        }
        concert.updated_at = Utc::now();
        Ok(concert.clone())
    }

    async fn mark_cancelled(&self, id: Uuid, status: ConcertStatus) -> AppResult<Concert> {
        let mut concerts = self.0.concerts.lock().unwrap();
        let concert = concerts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Concert not found"))?;
        concert.status = status;
        concert.deleted = true;
        concert.updated_at = Utc::now();
        Ok(concert.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.0.concerts.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for InMemory {
    async fn create(&self, reservation: Reservation) -> AppResult<Reservation> {
        self.0.reservations.lock().unwrap().push(reservation.clone());
        Ok(reservation)
    }

    async fn find_by_user_and_concert(
        &self,
        user_id: Uuid,
        concert_id: Uuid,
    ) -> AppResult<Option<Reservation>> {
        Ok(self
            .0
            .reservations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.concert_id == concert_id)
            .cloned())
    }

    async fn count_active_for_concert(&self, concert_id: Uuid) -> AppResult<u64> {
        Ok(self
            .0
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.concert_id == concert_id && r.status != ReservationStatus::Cancelled)
            .count() as u64)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Reservation>> {
        Ok(self
            .0
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_concert(&self, concert_id: Uuid) -> AppResult<Vec<Reservation>> {
        Ok(self
            .0
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.concert_id == concert_id)
            .cloned()
            .collect())
    }

    async fn list_paginated(&self, offset: u64, limit: u64) -> AppResult<(Vec<Reservation>, u64)> {
        let reservations = self.0.reservations.lock().unwrap();
        let total = reservations.len() as u64;
        let page = reservations
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn set_status(&self, id: Uuid, status: ReservationStatus) -> AppResult<Reservation> {
        let mut reservations = self.0.reservations.lock().unwrap();
        let reservation = reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;
        reservation.status = status;
        Ok(reservation.clone())
    }

    async fn cancel_confirmed_for_concert(&self, concert_id: Uuid) -> AppResult<u64> {
        let mut reservations = self.0.reservations.lock().unwrap();
        let mut mutated = 0;
        for reservation in reservations
            .iter_mut()
            .filter(|r| r.concert_id == concert_id && r.status == ReservationStatus::Confirmed)
        {
            reservation.status = ReservationStatus::Cancelled;
            reservation.deleted = true;
            mutated += 1;
        }
        Ok(mutated)
    }

    async fn count_with_status(&self, status: ReservationStatus) -> AppResult<u64> {
        Ok(self
            .0
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == status)
            .count() as u64)
    }

    async fn count_cancelled_not_deleted(&self) -> AppResult<u64> {
        Ok(self
            .0
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == ReservationStatus::Cancelled && !r.deleted)
            .count() as u64)
    }
}

#[async_trait]
impl TransactionRepository for InMemory {
    async fn create(&self, record: NewTransaction) -> AppResult<Transaction> {
        let transaction = Transaction {
            id: Uuid::new_v4(),
            reservation_id: record.reservation_id,
            user_id: record.user_id,
            username: record.username,
            concert_name: record.concert_name,
            action: record.action,
            created_at: Utc::now(),
        };
        self.0.transactions.lock().unwrap().push(transaction.clone());
        Ok(transaction)
    }

    async fn list_paginated(&self, offset: u64, limit: u64) -> AppResult<(Vec<Transaction>, u64)> {
        let transactions = self.0.transactions.lock().unwrap();
        let total = transactions.len() as u64;
        // Newest first
        let page = transactions
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn list_for_user_paginated(
        &self,
        user_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Transaction>, u64)> {
        let transactions = self.0.transactions.lock().unwrap();
        let scoped: Vec<Transaction> = transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        let total = scoped.len() as u64;
        let page = scoped
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }
}

impl UnitOfWork for InMemory {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    fn concerts(&self) -> Arc<dyn ConcertRepository> {
        Arc::new(self.clone())
    }

    fn reservations(&self) -> Arc<dyn ReservationRepository> {
        Arc::new(self.clone())
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        Arc::new(self.clone())
    }
}

fn services(
    store: &InMemory,
) -> (
    ReservationManager<InMemory>,
    ConcertManager<InMemory>,
    TransactionLedger<InMemory>,
) {
    let uow = Arc::new(store.clone());
    (
        ReservationManager::new(uow.clone()),
        ConcertManager::new(uow.clone()),
        TransactionLedger::new(uow),
    )
}

// =============================================================================
// Flow tests
// =============================================================================

#[tokio::test]
async fn seats_fill_up_and_free_on_cancellation() {
    let store = InMemory::default();
    let alice = store.seed_user("Alice");
    let bob = store.seed_user("Bob");
    let carol = store.seed_user("Carol");
    let concert = store.seed_concert("Two Seater", 2);
    let (reservations, _, _) = services(&store);

    reservations.reserve_seat(alice.id, concert.id).await.unwrap();
    reservations.reserve_seat(bob.id, concert.id).await.unwrap();

    // Third seat does not exist
    let err = reservations
        .reserve_seat(carol.id, concert.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CapacityExceeded(_)));

    // Alice cancels, which frees her seat for Carol
    reservations.cancel_reserve(alice.id, concert.id).await.unwrap();
    reservations.reserve_seat(carol.id, concert.id).await.unwrap();

    // But Alice herself may not come back
    let err = reservations
        .reserve_seat(alice.id, concert.id)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::Conflict(msg) if msg == "Cannot reserve again after previous cancellation")
    );
}

#[tokio::test]
async fn double_cancel_is_rejected() {
    let store = InMemory::default();
    let alice = store.seed_user("Alice");
    let concert = store.seed_concert("One Night Only", 10);
    let (reservations, _, _) = services(&store);

    reservations.reserve_seat(alice.id, concert.id).await.unwrap();
    reservations.cancel_reserve(alice.id, concert.id).await.unwrap();

    let err = reservations
        .cancel_reserve(alice.id, concert.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(msg) if msg == "Reservation already cancelled"));
}

#[tokio::test]
async fn ledger_records_every_lifecycle_event() {
    let store = InMemory::default();
    let alice = store.seed_user("Alice");
    let concert = store.seed_concert("Audited Night", 5);
    let (reservations, _, ledger) = services(&store);

    reservations.reserve_seat(alice.id, concert.id).await.unwrap();
    reservations.cancel_reserve(alice.id, concert.id).await.unwrap();

    let page = ledger
        .get_user_transactions(alice.id, PaginationParams::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 2);

    // Newest first: the cancellation precedes the confirmation
    assert_eq!(page.data[0].action, TransactionAction::Cancelled);
    assert_eq!(page.data[1].action, TransactionAction::Confirmed);

    // Display names are snapshotted onto the ledger rows
    assert_eq!(page.data[0].username, "Alice");
    assert_eq!(page.data[0].concert_name, "Audited Night");
}

#[tokio::test]
async fn ledger_of_unknown_user_is_not_found() {
    let store = InMemory::default();
    let (_, _, ledger) = services(&store);

    let err = ledger
        .get_user_transactions(Uuid::new_v4(), PaginationParams::new(1, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg == "No transactions found for this user"));
}

#[tokio::test]
async fn concert_cancel_cascades_and_blocks_new_reservations() {
    let store = InMemory::default();
    let alice = store.seed_user("Alice");
    let bob = store.seed_user("Bob");
    let carol = store.seed_user("Carol");
    let concert = store.seed_concert("Doomed Show", 10);
    let (reservations, concerts, ledger) = services(&store);

    reservations.reserve_seat(alice.id, concert.id).await.unwrap();
    reservations.reserve_seat(bob.id, concert.id).await.unwrap();
    // Bob cancels before the admin does
    reservations.cancel_reserve(bob.id, concert.id).await.unwrap();

    let outcome = concerts.cancel(concert.id).await.unwrap();
    assert_eq!(outcome.concert.status, ConcertStatus::Canceled);
    assert!(outcome.concert.deleted);
    // Both reservations are audited even though only Alice's was still confirmed
    assert_eq!(outcome.reservations_updated_count, 2);

    // New reservations are refused
    let err = reservations
        .reserve_seat(carol.id, concert.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(msg) if msg == "This concert has been cancelled"));

    // Cancelling again is refused too
    let err = concerts.cancel(concert.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    // The global ledger holds CONFIRMED x2, CANCELLED x1, DELETED_BY_ADMIN x2
    let page = ledger
        .get_all_transactions(PaginationParams::new(1, 50))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 5);
    let admin_deletes = page
        .data
        .iter()
        .filter(|t| t.action == TransactionAction::DeletedByAdmin)
        .count();
    assert_eq!(admin_deletes, 2);
}

#[tokio::test]
async fn dashboard_reflects_cascade_semantics() {
    let store = InMemory::default();
    let alice = store.seed_user("Alice");
    let bob = store.seed_user("Bob");
    let doomed = store.seed_concert("Doomed", 100);
    let healthy = store.seed_concert("Healthy", 250);
    let (reservations, concerts, _) = services(&store);

    reservations.reserve_seat(alice.id, doomed.id).await.unwrap();
    reservations.reserve_seat(alice.id, healthy.id).await.unwrap();
    reservations.reserve_seat(bob.id, healthy.id).await.unwrap();
    // Bob backs out himself
    reservations.cancel_reserve(bob.id, healthy.id).await.unwrap();

    concerts.cancel(doomed.id).await.unwrap();

    let stats = reservations.get_dashboard_stats().await.unwrap();
    // Cancelled concert's capacity no longer counts
    assert_eq!(stats.total_seats, 250);
    // Only Alice's reservation on the healthy concert is still confirmed
    assert_eq!(stats.reserved_count, 1);
    // Bob's self-cancellation counts; the cascade-cancelled row does not
    assert_eq!(stats.cancelled_count, 1);
}

#[tokio::test]
async fn catalog_hides_cancelled_concerts_and_annotates_own_reservation() {
    let store = InMemory::default();
    let alice = store.seed_user("Alice");
    let visible = store.seed_concert("Visible", 10);
    let hidden = store.seed_concert("Hidden", 10);
    let (reservations, concerts, _) = services(&store);

    reservations.reserve_seat(alice.id, visible.id).await.unwrap();
    concerts.cancel(hidden.id).await.unwrap();

    let page = concerts
        .find_all(PaginationParams::new(1, 10), Some(alice.id))
        .await
        .unwrap();

    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data.len(), 1);
    let entry = &page.data[0];
    assert_eq!(entry.concert.id, visible.id);
    assert!(entry.reservation_id.is_some());
    assert_eq!(entry.reservation_status, Some(ReservationStatus::Confirmed));
}
