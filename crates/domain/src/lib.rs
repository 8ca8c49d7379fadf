//! Domain model for the reservation system.
//!
//! A reservation links one table, one restaurant, a date, and a party size.
//! Every mutation of a reservation produces an immutable history record,
//! and every successful creation produces a `TableReservedEvent` for
//! downstream consumers.

pub mod error;
pub mod event;
pub mod history;
pub mod reservation;

pub use error::DomainError;
pub use event::TableReservedEvent;
pub use history::{HistoryOperation, ReservationHistory};
pub use reservation::Reservation;
