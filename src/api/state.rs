//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{
    AuthService, ConcertService, ReservationService, ServiceContainer, Services,
    TransactionService, UserService,
};

/// Application state containing all services (DI container).
///
/// Use `from_config()` for recommended initialization with full
/// ServiceContainer and UnitOfWork support.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Concert service
    pub concert_service: Arc<dyn ConcertService>,
    /// Reservation service
    pub reservation_service: Arc<dyn ReservationService>,
    /// Transaction service
    pub transaction_service: Arc<dyn TransactionService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// This is the recommended way to create AppState as it uses
    /// the ServiceContainer for centralized service management.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            concert_service: container.concerts(),
            reservation_service: container.reservations(),
            transaction_service: container.transactions(),
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        concert_service: Arc<dyn ConcertService>,
        reservation_service: Arc<dyn ReservationService>,
        transaction_service: Arc<dyn TransactionService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            concert_service,
            reservation_service,
            transaction_service,
            database,
        }
    }
}
