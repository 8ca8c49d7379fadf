//! Shared types for the reservation system.

pub mod types;

pub use types::{ReservationId, RestaurantId, TableId};
