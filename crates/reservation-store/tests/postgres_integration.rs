//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p reservation-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::{ReservationId, RestaurantId, TableId};
use domain::{HistoryOperation, Reservation, ReservationHistory};
use reservation_store::{PostgresReservationStore, ReservationStore, StoreError};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn fresh_store() -> PostgresReservationStore {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();
    let store = PostgresReservationStore::new(pool);
    store.run_migrations().await.unwrap();

    // Each test starts from empty tables
    sqlx::query("TRUNCATE reservations, reservation_history")
        .execute(store.pool())
        .await
        .unwrap();

    store
}

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
async fn create_then_get_roundtrips() {
    let store = fresh_store().await;
    let reservation = sample_reservation();
    let history = ReservationHistory::record(&reservation, HistoryOperation::Create);

    store.create(&reservation, &history).await.unwrap();

    let loaded = store.get(reservation.id()).await.unwrap().unwrap();
    assert_eq!(loaded, reservation);

    let histories = store.list_history().await.unwrap();
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].operation, HistoryOperation::Create);
    assert_eq!(histories[0].reservation_id, reservation.id());
}

#[tokio::test]
async fn get_missing_returns_none() {
    let store = fresh_store().await;
    assert!(store.get(ReservationId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_persists_new_values_and_history() {
    let store = fresh_store().await;
    let mut reservation = sample_reservation();
    store
        .create(
            &reservation,
            &ReservationHistory::record(&reservation, HistoryOperation::Create),
        )
        .await
        .unwrap();

    reservation
        .reschedule("2025-07-15".parse().unwrap(), 6)
        .unwrap();
    store
        .update(
            &reservation,
            &ReservationHistory::record(&reservation, HistoryOperation::Update),
        )
        .await
        .unwrap();

    let loaded = store.get(reservation.id()).await.unwrap().unwrap();
    assert_eq!(loaded.party_size(), 6);
    assert_eq!(
        loaded.reservation_date(),
        "2025-07-15".parse::<chrono::NaiveDate>().unwrap()
    );

    let histories = store.list_history().await.unwrap();
    assert_eq!(histories.len(), 2);
    assert_eq!(histories[1].operation, HistoryOperation::Update);
    assert_eq!(histories[1].party_size, 6);
}

#[tokio::test]
async fn update_missing_is_not_found_and_appends_nothing() {
    let store = fresh_store().await;
    let reservation = sample_reservation();
    let history = ReservationHistory::record(&reservation, HistoryOperation::Update);

    let err = store.update(&reservation, &history).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(store.list_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_commits_row_removal_and_history_atomically() {
    let store = fresh_store().await;
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
    let histories = store.list_history().await.unwrap();
    assert_eq!(histories.len(), 2);
    assert_eq!(histories[1].operation, HistoryOperation::Delete);
    assert_eq!(histories[1].reservation_date, reservation.reservation_date());
    assert_eq!(histories[1].party_size, reservation.party_size());
}

#[tokio::test]
async fn compensate_create_removes_row_and_history() {
    let store = fresh_store().await;
    let reservation = sample_reservation();
    store
        .create(
            &reservation,
            &ReservationHistory::record(&reservation, HistoryOperation::Create),
        )
        .await
        .unwrap();

    store.compensate_create(reservation.id()).await.unwrap();

    assert!(store.get(reservation.id()).await.unwrap().is_none());
    assert!(store.list_history().await.unwrap().is_empty());

    // Idempotent when nothing is left to unwind
    store.compensate_create(reservation.id()).await.unwrap();
}

#[tokio::test]
async fn delete_rolls_back_when_history_append_fails() {
    let store = fresh_store().await;
    let reservation = sample_reservation();
    store
        .create(
            &reservation,
            &ReservationHistory::record(&reservation, HistoryOperation::Create),
        )
        .await
        .unwrap();

    // Occupy the DELETE record's primary key so the append inside the
    // delete transaction hits a unique violation
    let history = ReservationHistory::record(&reservation, HistoryOperation::Delete);
    sqlx::query(
        "INSERT INTO reservation_history \
         (id, reservation_id, reservation_date, party_size, operation, recorded_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(history.id)
    .bind(history.reservation_id.as_uuid())
    .bind(history.reservation_date)
    .bind(history.party_size as i64)
    .bind("UPDATE")
    .bind(history.recorded_at)
    .execute(store.pool())
    .await
    .unwrap();

    let err = store.delete(reservation.id(), &history).await.unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));

    // The row removal rolled back together with the failed append
    assert!(store.get(reservation.id()).await.unwrap().is_some());
}

#[tokio::test]
async fn party_size_beyond_i32_roundtrips() {
    let store = fresh_store().await;
    let reservation = Reservation::new(
        "2025-06-01".parse().unwrap(),
        u32::MAX,
        TableId::new(),
        RestaurantId::new(),
    )
    .unwrap();

    store
        .create(
            &reservation,
            &ReservationHistory::record(&reservation, HistoryOperation::Create),
        )
        .await
        .unwrap();

    let loaded = store.get(reservation.id()).await.unwrap().unwrap();
    assert_eq!(loaded.party_size(), u32::MAX);
    assert_eq!(store.list_history().await.unwrap()[0].party_size, u32::MAX);
}

#[tokio::test]
async fn list_returns_all_reservations() {
    let store = fresh_store().await;
    for _ in 0..3 {
        let reservation = sample_reservation();
        store
            .create(
                &reservation,
                &ReservationHistory::record(&reservation, HistoryOperation::Create),
            )
            .await
            .unwrap();
    }

    assert_eq!(store.list().await.unwrap().len(), 3);
}
