//! Reservation CRUD and history endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, Utc};
use common::{ReservationId, RestaurantId, TableId};
use domain::{Reservation, ReservationHistory};
use gateways::{RestaurantGateway, TableGateway};
use orchestrator::ReservationService;
use reservation_store::ReservationStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S, T, R>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    pub reservations: ReservationService<S, T, R>,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub reservation_date: NaiveDate,
    pub party_size: u32,
    pub table_id: TableId,
    pub restaurant_id: RestaurantId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub reservation_date: NaiveDate,
    pub party_size: u32,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub reservation_date: NaiveDate,
    pub party_size: u32,
    pub table_id: TableId,
    pub restaurant_id: RestaurantId,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id(),
            reservation_date: reservation.reservation_date(),
            party_size: reservation.party_size(),
            table_id: reservation.table_id(),
            restaurant_id: reservation.restaurant_id(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub id: Uuid,
    pub reservation_id: ReservationId,
    pub reservation_date: NaiveDate,
    pub party_size: u32,
    pub operation: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<ReservationHistory> for HistoryResponse {
    fn from(history: ReservationHistory) -> Self {
        Self {
            id: history.id,
            reservation_id: history.reservation_id,
            reservation_date: history.reservation_date,
            party_size: history.party_size,
            operation: history.operation.to_string(),
            recorded_at: history.recorded_at,
        }
    }
}

// -- Handlers --

/// POST /reservations — create a new reservation.
#[tracing::instrument(skip(state, req))]
pub async fn create<S, T, R>(
    State(state): State<Arc<AppState<S, T, R>>>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    let reservation = state
        .reservations
        .create_reservation(
            req.reservation_date,
            req.party_size,
            req.table_id,
            req.restaurant_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

/// GET /reservations — list all reservations.
#[tracing::instrument(skip(state))]
pub async fn list<S, T, R>(
    State(state): State<Arc<AppState<S, T, R>>>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    let reservations = state.reservations.list_reservations().await?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

/// GET /reservations/:id — fetch one reservation.
#[tracing::instrument(skip(state))]
pub async fn get<S, T, R>(
    State(state): State<Arc<AppState<S, T, R>>>,
    Path(id): Path<String>,
) -> Result<Json<ReservationResponse>, ApiError>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    let id = parse_reservation_id(&id)?;
    let reservation = state.reservations.get_reservation(id).await?;
    Ok(Json(reservation.into()))
}

/// PUT /reservations/:id — update date and party size.
#[tracing::instrument(skip(state, req))]
pub async fn update<S, T, R>(
    State(state): State<Arc<AppState<S, T, R>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReservationRequest>,
) -> Result<Json<ReservationResponse>, ApiError>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    let id = parse_reservation_id(&id)?;
    let reservation = state
        .reservations
        .update_reservation(id, req.reservation_date, req.party_size)
        .await?;
    Ok(Json(reservation.into()))
}

/// DELETE /reservations/:id — delete a reservation.
#[tracing::instrument(skip(state))]
pub async fn delete<S, T, R>(
    State(state): State<Arc<AppState<S, T, R>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    let id = parse_reservation_id(&id)?;
    state.reservations.delete_reservation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /reservations/history — all audit records.
#[tracing::instrument(skip(state))]
pub async fn history<S, T, R>(
    State(state): State<Arc<AppState<S, T, R>>>,
) -> Result<Json<Vec<HistoryResponse>>, ApiError>
where
    S: ReservationStore,
    T: TableGateway,
    R: RestaurantGateway,
{
    let records = state.reservations.list_history().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

fn parse_reservation_id(id: &str) -> Result<ReservationId, ApiError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid reservation id: {e}")))?;
    Ok(ReservationId::from_uuid(uuid))
}
