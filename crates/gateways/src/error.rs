//! Gateway error types.

use thiserror::Error;

/// Errors returned by remote-service gateways.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A conditional update was rejected because the table already holds
    /// a reservation reference.
    #[error("Table already holds a reservation")]
    Conflict,

    /// The remote side reported the resource missing.
    #[error("Remote resource not found: {0}")]
    NotFound(String),

    /// The request never produced a usable response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The remote service answered with an error status.
    #[error("Remote service error (status {status}): {message}")]
    Remote { status: u16, message: String },
}
