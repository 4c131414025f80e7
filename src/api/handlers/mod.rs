//! HTTP request handlers.

pub mod concert_handler;
pub mod reservation_handler;
pub mod transaction_handler;
pub mod user_handler;

pub use concert_handler::concert_routes;
pub use reservation_handler::reservation_routes;
pub use transaction_handler::transaction_routes;
pub use user_handler::{auth_routes, user_routes};
