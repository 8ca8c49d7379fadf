//! Orchestrator error types.

use common::{ReservationId, RestaurantId, TableId};
use domain::DomainError;
use gateways::GatewayError;
use reservation_store::StoreError;
use thiserror::Error;

/// Errors surfaced by reservation operations.
///
/// Only pre-commit validation failures abort a create; everything after
/// the durable write is degraded to logging inside the service and never
/// appears here, except a lost availability race which compensates and
/// reports `AlreadyReserved`.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The referenced table does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    /// The table already holds a reservation reference.
    #[error("Table {0} is already reserved")]
    AlreadyReserved(TableId),

    /// The referenced restaurant does not exist.
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(RestaurantId),

    /// The referenced reservation does not exist.
    #[error("Reservation not found: {0}")]
    NotFound(ReservationId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A pre-commit gateway call failed.
    #[error("Gateway error: {0}")]
    Gateway(GatewayError),

    /// The local store failed.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<GatewayError> for ReservationError {
    fn from(err: GatewayError) -> Self {
        ReservationError::Gateway(err)
    }
}

impl From<StoreError> for ReservationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ReservationError::NotFound(id),
            other => ReservationError::Store(other),
        }
    }
}

/// Convenience type alias for orchestrator results.
pub type Result<T> = std::result::Result<T, ReservationError>;
