//! Store error types.

use common::ReservationId;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted reservation does not exist.
    #[error("Reservation not found: {0}")]
    NotFound(ReservationId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be mapped back to its domain type.
    #[error("Corrupt stored record: {0}")]
    CorruptRecord(String),
}
