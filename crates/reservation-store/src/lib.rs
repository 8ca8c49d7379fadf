//! Durable storage for reservations and their audit history.
//!
//! The store owns reservation records and the append-only history log.
//! Both live behind one trait so that a mutation and the history record
//! describing it commit as a single atomic unit, for every backend.
//!
//! Two implementations are provided:
//! - [`InMemoryReservationStore`] for tests and default server wiring
//! - [`PostgresReservationStore`] backed by sqlx

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryReservationStore;
pub use postgres::PostgresReservationStore;
pub use store::ReservationStore;

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
