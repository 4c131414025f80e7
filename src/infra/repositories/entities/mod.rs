//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod concert;
pub mod reservation;
pub mod transaction;
pub mod user;
