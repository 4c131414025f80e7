//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    concert_handler, reservation_handler, transaction_handler, user_handler,
};
use crate::domain::{
    CancelOutcome, Concert, ConcertStatus, ConcertWithReservation, DashboardStats, Reservation,
    ReservationStatus, ReservationWithConcert, Transaction, TransactionAction, UserResponse,
    UserRole,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the concert reservation API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Concert API",
        version = "0.1.0",
        description = "Concert seat reservation service with Axum, SeaORM, and clean architecture",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
        (url = "https://api.example.com", description = "Production server")
    ),
    paths(
        // User and authentication endpoints
        user_handler::register,
        user_handler::login,
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        // Concert endpoints
        concert_handler::create_concert,
        concert_handler::list_concerts,
        concert_handler::get_concert,
        concert_handler::update_concert,
        concert_handler::cancel_concert,
        concert_handler::delete_concert,
        // Reservation endpoints
        reservation_handler::reserve_seat,
        reservation_handler::cancel_reserve,
        reservation_handler::list_reservations,
        reservation_handler::user_reservations,
        reservation_handler::dashboard,
        // Transaction endpoints
        transaction_handler::list_transactions,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Concert,
            ConcertStatus,
            ConcertWithReservation,
            CancelOutcome,
            Reservation,
            ReservationStatus,
            ReservationWithConcert,
            DashboardStats,
            Transaction,
            TransactionAction,
            // Auth types
            user_handler::RegisterRequest,
            user_handler::LoginRequest,
            TokenResponse,
            // Request types
            user_handler::UpdateUserRequest,
            concert_handler::CreateConcertRequest,
            concert_handler::UpdateConcertRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and user management"),
        (name = "Concerts", description = "Concert catalog and admin cancellation"),
        (name = "Reservations", description = "Seat reservation operations"),
        (name = "Transactions", description = "Reservation audit ledger")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/v1/user/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
