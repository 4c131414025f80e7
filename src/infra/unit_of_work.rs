//! Unit of Work - centralized repository access.
//!
//! Services reach every repository through this trait, keeping them
//! independent of the concrete persistence layer and mockable in tests.
//!
//! Multi-document operations (the concert cancellation cascade in
//! particular) run as sequential single-document writes with no enclosing
//! transaction; a failure partway leaves earlier writes in place.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    ConcertRepository, ConcertStore, ReservationRepository, ReservationStore,
    TransactionRepository, TransactionStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get concert repository
    fn concerts(&self) -> Arc<dyn ConcertRepository>;

    /// Get reservation repository
    fn reservations(&self) -> Arc<dyn ReservationRepository>;

    /// Get transaction (audit ledger) repository
    fn transactions(&self) -> Arc<dyn TransactionRepository>;
}

/// Concrete implementation of UnitOfWork backed by SeaORM stores
pub struct Persistence {
    user_repo: Arc<UserStore>,
    concert_repo: Arc<ConcertStore>,
    reservation_repo: Arc<ReservationStore>,
    transaction_repo: Arc<TransactionStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance over a shared connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            concert_repo: Arc::new(ConcertStore::new(db.clone())),
            reservation_repo: Arc::new(ReservationStore::new(db.clone())),
            transaction_repo: Arc::new(TransactionStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn concerts(&self) -> Arc<dyn ConcertRepository> {
        self.concert_repo.clone()
    }

    fn reservations(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repo.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        self.transaction_repo.clone()
    }
}
