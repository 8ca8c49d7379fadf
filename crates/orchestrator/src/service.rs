//! The reservation orchestrator.

use chrono::NaiveDate;
use common::{ReservationId, RestaurantId, TableId};
use domain::{
    HistoryOperation, Reservation, ReservationHistory, TableReservedEvent,
};
use gateways::{GatewayError, RestaurantGateway, TableGateway};
use messaging::PublishQueue;
use reservation_store::ReservationStore;

use crate::error::{ReservationError, Result};

/// Sequences reservation mutations across the store, the remote
/// gateways, and the event pipeline.
///
/// Generic over the store and gateway implementations so the same
/// orchestration runs against the in-memory doubles in tests and the
/// Postgres/HTTP implementations in production.
pub struct ReservationService<S, T, R>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    store: S,
    tables: T,
    restaurants: R,
    publish_queue: PublishQueue,
}

impl<S, T, R> ReservationService<S, T, R>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    /// Creates a new reservation service.
    pub fn new(store: S, tables: T, restaurants: R, publish_queue: PublishQueue) -> Self {
        Self {
            store,
            tables,
            restaurants,
            publish_queue,
        }
    }

    /// Creates a reservation.
    ///
    /// Pre-commit validation (table exists and is free, restaurant
    /// exists) aborts with no state touched. After the local commit the
    /// remote table claim is conditional: a rejected claim means a
    /// concurrent create won the race, so the local reservation is
    /// compensated away and the caller sees `AlreadyReserved`. A plain
    /// claim failure leaves local and remote state inconsistent by
    /// accepted policy; it is logged and the create still succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn create_reservation(
        &self,
        reservation_date: NaiveDate,
        party_size: u32,
        table_id: TableId,
        restaurant_id: RestaurantId,
    ) -> Result<Reservation> {
        metrics::counter!("reservation_creates_total").increment(1);

        // 1. Table must exist
        let table = self
            .tables
            .get(table_id)
            .await?
            .ok_or(ReservationError::TableNotFound(table_id))?;

        // 2. Table must be free
        if table.is_reserved() {
            metrics::counter!("reservation_create_conflicts_total").increment(1);
            return Err(ReservationError::AlreadyReserved(table_id));
        }

        // 3. Restaurant must exist
        let restaurant = self
            .restaurants
            .get(restaurant_id)
            .await?
            .ok_or(ReservationError::RestaurantNotFound(restaurant_id))?;

        // 4/5. Durability commit point: reservation + CREATE history
        let reservation = Reservation::new(reservation_date, party_size, table_id, restaurant_id)?;
        let history = ReservationHistory::record(&reservation, HistoryOperation::Create);
        self.store.create(&reservation, &history).await?;

        tracing::info!(
            reservation_id = %reservation.id(),
            restaurant = %restaurant.name,
            "reservation committed"
        );

        // 6. Claim the remote table, conditional on it still being free
        match self
            .tables
            .update_if_unreserved(table_id, reservation.id())
            .await
        {
            Ok(_) => {}
            Err(GatewayError::Conflict) => {
                // Lost the race: another create claimed the table between
                // our read and write. Unwind the local commit.
                metrics::counter!("reservation_create_conflicts_total").increment(1);
                tracing::warn!(
                    reservation_id = %reservation.id(),
                    %table_id,
                    "table claimed concurrently, compensating local reservation"
                );
                if let Err(e) = self.store.compensate_create(reservation.id()).await {
                    tracing::error!(
                        reservation_id = %reservation.id(),
                        error = %e,
                        "compensation failed, reservation left dangling"
                    );
                }
                return Err(ReservationError::AlreadyReserved(table_id));
            }
            Err(e) => {
                // Accepted inconsistency window: the reservation is
                // durable locally but the table service missed the claim.
                metrics::counter!("table_claim_failures_total").increment(1);
                tracing::error!(
                    reservation_id = %reservation.id(),
                    %table_id,
                    error = %e,
                    "table availability write-back failed, continuing"
                );
            }
        }

        // 7. Detached publication; outcome invisible to this caller
        let event = TableReservedEvent::new(table_id, restaurant_id, reservation_date);
        self.publish_queue.enqueue(event);

        Ok(reservation)
    }

    /// Retrieves a reservation by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        self.store
            .get(id)
            .await?
            .ok_or(ReservationError::NotFound(id))
    }

    /// Retrieves all reservations.
    #[tracing::instrument(skip(self))]
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        Ok(self.store.list().await?)
    }

    /// Updates a reservation's date and party size.
    ///
    /// The table and restaurant associations are immutable, so no remote
    /// validation re-runs and no event is published.
    #[tracing::instrument(skip(self))]
    pub async fn update_reservation(
        &self,
        id: ReservationId,
        reservation_date: NaiveDate,
        party_size: u32,
    ) -> Result<Reservation> {
        let mut reservation = self
            .store
            .get(id)
            .await?
            .ok_or(ReservationError::NotFound(id))?;

        reservation.reschedule(reservation_date, party_size)?;
        let history = ReservationHistory::record(&reservation, HistoryOperation::Update);
        self.store.update(&reservation, &history).await?;

        metrics::counter!("reservation_updates_total").increment(1);
        Ok(reservation)
    }

    /// Deletes a reservation.
    ///
    /// The pre-deletion values are snapshotted into a DELETE history
    /// record committed atomically with the removal.
    #[tracing::instrument(skip(self))]
    pub async fn delete_reservation(&self, id: ReservationId) -> Result<()> {
        let reservation = self
            .store
            .get(id)
            .await?
            .ok_or(ReservationError::NotFound(id))?;

        let history = ReservationHistory::record(&reservation, HistoryOperation::Delete);
        self.store.delete(id, &history).await?;

        metrics::counter!("reservation_deletes_total").increment(1);
        Ok(())
    }

    /// Retrieves all history records.
    #[tracing::instrument(skip(self))]
    pub async fn list_history(&self) -> Result<Vec<ReservationHistory>> {
        Ok(self.store.list_history().await?)
    }
}
