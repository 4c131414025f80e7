//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - Repositories per aggregate
//! - Unit of Work for centralized repository access

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    ConcertRepository, ConcertStore, ReservationRepository, ReservationStore,
    TransactionRepository, TransactionStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockConcertRepository, MockReservationRepository, MockTransactionRepository,
    MockUserRepository,
};
