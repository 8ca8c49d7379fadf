//! Reservation orchestration.
//!
//! The orchestrator sequences a create across the table-availability and
//! restaurant-catalog gateways, the local store, and the event pipeline:
//!
//! 1. Validate table existence and availability
//! 2. Validate restaurant existence
//! 3. Commit the reservation with its CREATE audit record
//! 4. Conditionally claim the remote table
//! 5. Hand the domain event to the detached publish queue
//!
//! There is no cross-service transaction. The local commit (step 3) is
//! the success criterion; the remote claim compensates on a lost race and
//! tolerates plain failures, and publication is fire-and-forget.

pub mod error;
pub mod service;

pub use error::ReservationError;
pub use service::ReservationService;
