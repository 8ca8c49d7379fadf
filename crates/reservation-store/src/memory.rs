use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ReservationId;
use domain::{Reservation, ReservationHistory};
use tokio::sync::RwLock;

use crate::{Result, StoreError, store::ReservationStore};

#[derive(Debug, Default)]
struct State {
    reservations: HashMap<ReservationId, Reservation>,
    history: Vec<ReservationHistory>,
}

/// In-memory reservation store.
///
/// Holds reservations and the history log behind one lock, so every
/// mutation and its audit entry are atomic by construction. Provides the
/// same interface as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryReservationStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryReservationStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored reservations.
    pub async fn reservation_count(&self) -> usize {
        self.state.read().await.reservations.len()
    }

    /// Returns the number of history records.
    pub async fn history_count(&self) -> usize {
        self.state.read().await.history.len()
    }

    /// Clears all reservations and history.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.reservations.clear();
        state.history.clear();
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn create(
        &self,
        reservation: &Reservation,
        history: &ReservationHistory,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .reservations
            .insert(reservation.id(), reservation.clone());
        state.history.push(history.clone());
        Ok(())
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>> {
        Ok(self.state.read().await.reservations.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Reservation>> {
        Ok(self
            .state
            .read()
            .await
            .reservations
            .values()
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        reservation: &Reservation,
        history: &ReservationHistory,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.reservations.contains_key(&reservation.id()) {
            return Err(StoreError::NotFound(reservation.id()));
        }
        state
            .reservations
            .insert(reservation.id(), reservation.clone());
        state.history.push(history.clone());
        Ok(())
    }

    async fn delete(&self, id: ReservationId, history: &ReservationHistory) -> Result<()> {
        let mut state = self.state.write().await;
        if state.reservations.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        state.history.push(history.clone());
        Ok(())
    }

    async fn compensate_create(&self, id: ReservationId) -> Result<()> {
        let mut state = self.state.write().await;
        state.reservations.remove(&id);
        state.history.retain(|h| h.reservation_id != id);
        Ok(())
    }

    async fn list_history(&self) -> Result<Vec<ReservationHistory>> {
        Ok(self.state.read().await.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{RestaurantId, TableId};
    use domain::HistoryOperation;

    fn sample_reservation() -> Reservation {
        Reservation::new(
            "2025-06-01".parse().unwrap(),
            4,
            TableId::new(),
            RestaurantId::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_stores_reservation_and_history_together() {
        let store = InMemoryReservationStore::new();
        let reservation = sample_reservation();
        let history = ReservationHistory::record(&reservation, HistoryOperation::Create);

        store.create(&reservation, &history).await.unwrap();

        assert_eq!(store.reservation_count().await, 1);
        assert_eq!(store.history_count().await, 1);
        let loaded = store.get(reservation.id()).await.unwrap().unwrap();
        assert_eq!(loaded, reservation);
    }

    #[tokio::test]
    async fn update_missing_reservation_is_not_found() {
        let store = InMemoryReservationStore::new();
        let reservation = sample_reservation();
        let history = ReservationHistory::record(&reservation, HistoryOperation::Update);

        let err = store.update(&reservation, &history).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == reservation.id()));
        assert_eq!(store.history_count().await, 0);
    }

    #[tokio::test]
    async fn delete_removes_record_and_appends_history() {
        let store = InMemoryReservationStore::new();
        let reservation = sample_reservation();
        store
            .create(
                &reservation,
                &ReservationHistory::record(&reservation, HistoryOperation::Create),
            )
            .await
            .unwrap();

        store
            .delete(
                reservation.id(),
                &ReservationHistory::record(&reservation, HistoryOperation::Delete),
            )
            .await
            .unwrap();

        assert!(store.get(reservation.id()).await.unwrap().is_none());
        let history = store.list_history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].operation, HistoryOperation::Delete);
        assert_eq!(history[1].party_size, 4);
    }

    #[tokio::test]
    async fn compensate_create_erases_all_traces() {
        let store = InMemoryReservationStore::new();
        let reservation = sample_reservation();
        store
            .create(
                &reservation,
                &ReservationHistory::record(&reservation, HistoryOperation::Create),
            )
            .await
            .unwrap();

        store.compensate_create(reservation.id()).await.unwrap();

        assert_eq!(store.reservation_count().await, 0);
        assert_eq!(store.history_count().await, 0);
        // Idempotent on an already-removed reservation
        store.compensate_create(reservation.id()).await.unwrap();
    }
}
