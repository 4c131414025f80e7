//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod concert;
pub mod password;
pub mod reservation;
pub mod transaction;
pub mod user;

pub use concert::{
    CancelOutcome, Concert, ConcertStatus, ConcertWithReservation, CreateConcert, UpdateConcert,
};
pub use password::Password;
pub use reservation::{
    DashboardStats, Reservation, ReservationListItem, ReservationStatus, ReservationWithConcert,
};
pub use transaction::{NewTransaction, Transaction, TransactionAction};
pub use user::{CreateUser, UpdateUser, User, UserResponse, UserRole};
