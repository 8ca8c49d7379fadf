//! Immutable audit records for reservation mutations.

use chrono::{DateTime, NaiveDate, Utc};
use common::ReservationId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reservation::Reservation;

/// The kind of mutation a history record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryOperation {
    Create,
    Update,
    Delete,
}

impl HistoryOperation {
    /// Returns the canonical tag used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryOperation::Create => "CREATE",
            HistoryOperation::Update => "UPDATE",
            HistoryOperation::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HistoryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HistoryOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(HistoryOperation::Create),
            "UPDATE" => Ok(HistoryOperation::Update),
            "DELETE" => Ok(HistoryOperation::Delete),
            other => Err(format!("unknown history operation: {other}")),
        }
    }
}

/// An append-only audit entry describing one reservation mutation.
///
/// The reservation's date and party size are captured by value so the
/// record survives deletion of the reservation it describes. History is
/// never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationHistory {
    pub id: Uuid,
    pub reservation_id: ReservationId,
    pub reservation_date: NaiveDate,
    pub party_size: u32,
    pub operation: HistoryOperation,
    pub recorded_at: DateTime<Utc>,
}

impl ReservationHistory {
    /// Captures a snapshot of `reservation` under the given operation tag,
    /// timestamped now.
    pub fn record(reservation: &Reservation, operation: HistoryOperation) -> Self {
        Self {
            id: Uuid::new_v4(),
            reservation_id: reservation.id(),
            reservation_date: reservation.reservation_date(),
            party_size: reservation.party_size(),
            operation,
            recorded_at: Utc::now(),
        }
    }
}
