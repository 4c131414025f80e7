//! Service Container - centralized service access.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use super::{AuthService, ConcertService, ReservationService, TransactionService, UserService};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get concert service
    fn concerts(&self) -> Arc<dyn ConcertService>;

    /// Get reservation service
    fn reservations(&self) -> Arc<dyn ReservationService>;

    /// Get transaction service
    fn transactions(&self) -> Arc<dyn TransactionService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    concert_service: Arc<dyn ConcertService>,
    reservation_service: Arc<dyn ReservationService>,
    transaction_service: Arc<dyn TransactionService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        concert_service: Arc<dyn ConcertService>,
        reservation_service: Arc<dyn ReservationService>,
        transaction_service: Arc<dyn TransactionService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            concert_service,
            reservation_service,
            transaction_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{
            Authenticator, ConcertManager, ReservationManager, TransactionLedger, UserManager,
        };

        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            concert_service: Arc::new(ConcertManager::new(uow.clone())),
            reservation_service: Arc::new(ReservationManager::new(uow.clone())),
            transaction_service: Arc::new(TransactionLedger::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn concerts(&self) -> Arc<dyn ConcertService> {
        self.concert_service.clone()
    }

    fn reservations(&self) -> Arc<dyn ReservationService> {
        self.reservation_service.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionService> {
        self.transaction_service.clone()
    }
}
