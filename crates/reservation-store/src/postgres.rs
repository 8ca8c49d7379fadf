use async_trait::async_trait;
use common::{ReservationId, RestaurantId, TableId};
use domain::{Reservation, ReservationHistory};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{Result, StoreError, store::ReservationStore};

/// PostgreSQL-backed reservation store.
///
/// Each mutation runs inside one transaction covering the reservation row
/// and its history record.
#[derive(Clone)]
pub struct PostgresReservationStore {
    pool: PgPool,
}

impl PostgresReservationStore {
    /// Creates a new PostgreSQL reservation store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the schema from the migrations directory.
    pub async fn run_migrations(&self) -> Result<()> {
        tracing::info!("applying reservation schema migrations");
        sqlx::raw_sql(include_str!(
            "../../../migrations/001_create_reservations.sql"
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_reservation(row: &PgRow) -> Result<Reservation> {
        Ok(Reservation::from_parts(
            ReservationId::from_uuid(row.try_get::<Uuid, _>("id")?),
            row.try_get("reservation_date")?,
            u32::try_from(row.try_get::<i64, _>("party_size")?)
                .map_err(|e| StoreError::CorruptRecord(format!("party_size: {e}")))?,
            TableId::from_uuid(row.try_get::<Uuid, _>("table_id")?),
            RestaurantId::from_uuid(row.try_get::<Uuid, _>("restaurant_id")?),
        ))
    }

    fn row_to_history(row: &PgRow) -> Result<ReservationHistory> {
        let operation: String = row.try_get("operation")?;
        Ok(ReservationHistory {
            id: row.try_get("id")?,
            reservation_id: ReservationId::from_uuid(row.try_get::<Uuid, _>("reservation_id")?),
            reservation_date: row.try_get("reservation_date")?,
            party_size: u32::try_from(row.try_get::<i64, _>("party_size")?)
                .map_err(|e| StoreError::CorruptRecord(format!("party_size: {e}")))?,
            operation: operation.parse().map_err(StoreError::CorruptRecord)?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }
}

async fn append_history<'a, E>(executor: E, history: &ReservationHistory) -> Result<()>
where
    E: sqlx::Executor<'a, Database = sqlx::Postgres>,
{
    sqlx::query(
        "INSERT INTO reservation_history \
         (id, reservation_id, reservation_date, party_size, operation, recorded_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(history.id)
    .bind(history.reservation_id.as_uuid())
    .bind(history.reservation_date)
    .bind(history.party_size as i64)
    .bind(history.operation.as_str())
    .bind(history.recorded_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl ReservationStore for PostgresReservationStore {
    async fn create(
        &self,
        reservation: &Reservation,
        history: &ReservationHistory,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO reservations (id, reservation_date, party_size, table_id, restaurant_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(reservation.id().as_uuid())
        .bind(reservation.reservation_date())
        .bind(reservation.party_size() as i64)
        .bind(reservation.table_id().as_uuid())
        .bind(reservation.restaurant_id().as_uuid())
        .execute(&mut *tx)
        .await?;

        append_history(&mut *tx, history).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>> {
        let row = sqlx::query("SELECT * FROM reservations WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| Self::row_to_reservation(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<Reservation>> {
        let rows = sqlx::query("SELECT * FROM reservations ORDER BY reservation_date, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_reservation).collect()
    }

    async fn update(
        &self,
        reservation: &Reservation,
        history: &ReservationHistory,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE reservations SET reservation_date = $2, party_size = $3 WHERE id = $1",
        )
        .bind(reservation.id().as_uuid())
        .bind(reservation.reservation_date())
        .bind(reservation.party_size() as i64)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(reservation.id()));
        }

        append_history(&mut *tx, history).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: ReservationId, history: &ReservationHistory) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        append_history(&mut *tx, history).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn compensate_create(&self, id: ReservationId) -> Result<()> {
        tracing::debug!(%id, "unwinding reservation and its history");
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM reservation_history WHERE reservation_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_history(&self) -> Result<Vec<ReservationHistory>> {
        let rows = sqlx::query("SELECT * FROM reservation_history ORDER BY recorded_at, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_history).collect()
    }
}
