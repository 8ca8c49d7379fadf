//! Messaging error types.

use thiserror::Error;

/// Errors raised by publishers and broadcasters.
///
/// These never cross the orchestrator's request boundary; they are
/// consumed by the retry primitive and degraded to logging.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The broker rejected or never received the publish.
    #[error("Broker unavailable: {0}")]
    Broker(String),

    /// The live channel could not accept the payload.
    #[error("Broadcast failed: {0}")]
    Broadcast(String),
}
