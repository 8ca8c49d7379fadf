//! Domain validation errors.

use thiserror::Error;

/// Errors raised by domain-level validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Party size must be a positive integer.
    #[error("Invalid party size: {0} (must be greater than zero)")]
    InvalidPartySize(u32),
}
