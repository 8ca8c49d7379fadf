//! HTTP implementations of the gateway contracts.

use async_trait::async_trait;
use common::{ReservationId, RestaurantId, TableId};
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::GatewayError;
use crate::notification::NotificationGateway;
use crate::restaurant::{RestaurantGateway, RestaurantInfo};
use crate::table::{TableGateway, TableState};

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

async fn remote_error(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status, "remote service returned an error");
    GatewayError::Remote { status, message }
}

/// HTTP client for the table-availability service.
///
/// The conditional write targets `PUT {base}/tables/{id}/reservation`; the
/// service answers 409 when the table already holds a reservation, which
/// maps to [`GatewayError::Conflict`].
#[derive(Debug, Clone)]
pub struct HttpTableGateway {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReservationRef {
    reservation_id: ReservationId,
}

impl HttpTableGateway {
    /// Creates a client against the given base URL, e.g.
    /// `http://table-service:8082`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TableGateway for HttpTableGateway {
    async fn get(&self, id: TableId) -> Result<Option<TableState>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/tables/{id}", self.base_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.json::<TableState>().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(remote_error(response).await),
        }
    }

    async fn update_if_unreserved(
        &self,
        id: TableId,
        reservation_id: ReservationId,
    ) -> Result<TableState, GatewayError> {
        let response = self
            .client
            .put(format!("{}/tables/{id}/reservation", self.base_url))
            .json(&ReservationRef { reservation_id })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<TableState>().await?),
            StatusCode::CONFLICT => Err(GatewayError::Conflict),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound(format!("table {id}"))),
            _ => Err(remote_error(response).await),
        }
    }
}

/// HTTP client for the restaurant-catalog service.
#[derive(Debug, Clone)]
pub struct HttpRestaurantGateway {
    client: Client,
    base_url: String,
}

impl HttpRestaurantGateway {
    /// Creates a client against the given base URL, e.g.
    /// `http://restaurant-service:8083`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RestaurantGateway for HttpRestaurantGateway {
    async fn get(&self, id: RestaurantId) -> Result<Option<RestaurantInfo>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/restaurants/{id}", self.base_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.json::<RestaurantInfo>().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(remote_error(response).await),
        }
    }
}

/// HTTP client for the email-notification service.
#[derive(Debug, Clone)]
pub struct HttpNotificationGateway {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl HttpNotificationGateway {
    /// Creates a client against the given base URL, e.g.
    /// `http://notifications-service:8081`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl NotificationGateway for HttpNotificationGateway {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(format!("{}/sendEmail", self.base_url))
            .json(&EmailRequest { to, subject, body })
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(remote_error(response).await)
        }
    }
}
