use async_trait::async_trait;
use common::ReservationId;
use domain::{Reservation, ReservationHistory};

use crate::Result;

/// Core trait for reservation storage.
///
/// Every mutation takes the history record describing it and commits both
/// atomically: either the reservation change and its audit entry are both
/// durable, or neither is. The history log is append-only; nothing in this
/// trait updates or removes history entries except [`compensate_create`],
/// which unwinds a creation that lost the table-availability race.
///
/// All implementations must be thread-safe (Send + Sync).
///
/// [`compensate_create`]: ReservationStore::compensate_create
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persists a new reservation together with its CREATE history record.
    async fn create(
        &self,
        reservation: &Reservation,
        history: &ReservationHistory,
    ) -> Result<()>;

    /// Retrieves a reservation by ID, or `None` if absent.
    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>>;

    /// Retrieves all reservations.
    async fn list(&self) -> Result<Vec<Reservation>>;

    /// Overwrites an existing reservation together with its UPDATE history
    /// record. Fails with `NotFound` if the reservation does not exist.
    async fn update(
        &self,
        reservation: &Reservation,
        history: &ReservationHistory,
    ) -> Result<()>;

    /// Removes a reservation and appends its DELETE history record in the
    /// same atomic unit. Fails with `NotFound` if the reservation does not
    /// exist.
    async fn delete(&self, id: ReservationId, history: &ReservationHistory) -> Result<()>;

    /// Unwinds a just-created reservation: removes the record and its
    /// history entries as if the creation never happened.
    ///
    /// Only used when the conditional table-availability write-back is
    /// rejected after the local commit. Succeeds if the reservation is
    /// already gone.
    async fn compensate_create(&self, id: ReservationId) -> Result<()>;

    /// Retrieves all history records in append order.
    async fn list_history(&self) -> Result<Vec<ReservationHistory>>;
}
