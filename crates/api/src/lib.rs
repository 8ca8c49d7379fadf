//! HTTP API server with observability for the reservation system.
//!
//! Provides REST endpoints for reservation management and the audit
//! history, with structured logging (tracing) and Prometheus metrics.
//! Wiring also starts the background publish worker and the
//! table-reserved listener.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use gateways::{
    HttpNotificationGateway, HttpRestaurantGateway, HttpTableGateway,
    InMemoryNotificationGateway, InMemoryRestaurantGateway, InMemoryTableGateway,
    RestaurantGateway, TableGateway,
};
use messaging::topology::{TABLE_EVENTS_EXCHANGE, TABLE_RESERVED_KEY, TABLE_RESERVED_QUEUE};
use messaging::{
    InMemoryBroker, NotificationSettings, PublishQueue, RetryPolicy, TableReservedListener,
    TopicBroadcaster,
};
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::ReservationService;
use reservation_store::{InMemoryReservationStore, ReservationStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::reservations::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, T, R>(
    state: Arc<AppState<S, T, R>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: ReservationStore + 'static,
    T: TableGateway + 'static,
    R: RestaurantGateway + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/reservations", post(routes::reservations::create::<S, T, R>))
        .route("/reservations", get(routes::reservations::list::<S, T, R>))
        .route(
            "/reservations/history",
            get(routes::reservations::history::<S, T, R>),
        )
        .route(
            "/reservations/{id}",
            get(routes::reservations::get::<S, T, R>),
        )
        .route(
            "/reservations/{id}",
            put(routes::reservations::update::<S, T, R>),
        )
        .route(
            "/reservations/{id}",
            delete(routes::reservations::delete::<S, T, R>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Default in-memory wiring: store, gateways, broker, broadcaster, the
/// publish worker, and the table-reserved listener.
///
/// The handles are exposed so tests can seed tables and restaurants and
/// observe notifications and live broadcasts.
pub struct DefaultWiring {
    pub state:
        Arc<AppState<InMemoryReservationStore, InMemoryTableGateway, InMemoryRestaurantGateway>>,
    pub store: InMemoryReservationStore,
    pub tables: InMemoryTableGateway,
    pub restaurants: InMemoryRestaurantGateway,
    pub notifications: InMemoryNotificationGateway,
    pub broker: Arc<InMemoryBroker>,
    pub broadcaster: TopicBroadcaster,
}

/// Creates the default application state backed entirely by in-memory
/// implementations. Must run inside a Tokio runtime: it spawns the
/// publish worker and the listener.
pub fn create_default_state(notification: NotificationSettings) -> DefaultWiring {
    let store = InMemoryReservationStore::new();
    let tables = InMemoryTableGateway::new();
    let restaurants = InMemoryRestaurantGateway::new();
    let notifications = InMemoryNotificationGateway::new();
    let broker = Arc::new(InMemoryBroker::new());
    let broadcaster = TopicBroadcaster::new();
    let policy = RetryPolicy::default();

    let queue_rx = broker.bind(TABLE_EVENTS_EXCHANGE, TABLE_RESERVED_KEY, TABLE_RESERVED_QUEUE);
    TableReservedListener::new(
        notifications.clone(),
        broadcaster.clone(),
        notification,
        policy,
    )
    .spawn(queue_rx);

    let (publish_queue, _worker) = PublishQueue::start(broker.clone(), policy);

    let service = ReservationService::new(
        store.clone(),
        tables.clone(),
        restaurants.clone(),
        publish_queue,
    );

    DefaultWiring {
        state: Arc::new(AppState {
            reservations: service,
        }),
        store,
        tables,
        restaurants,
        notifications,
        broker,
        broadcaster,
    }
}

/// Creates application state talking to the remote services over HTTP,
/// with the given store backend. Must run inside a Tokio runtime.
pub fn create_remote_state<S>(
    store: S,
    table_url: &str,
    restaurant_url: &str,
    notification_url: &str,
    notification: NotificationSettings,
) -> Arc<AppState<S, HttpTableGateway, HttpRestaurantGateway>>
where
    S: ReservationStore + 'static,
{
    let broker = Arc::new(InMemoryBroker::new());
    let broadcaster = TopicBroadcaster::new();
    let policy = RetryPolicy::default();

    let queue_rx = broker.bind(TABLE_EVENTS_EXCHANGE, TABLE_RESERVED_KEY, TABLE_RESERVED_QUEUE);
    TableReservedListener::new(
        HttpNotificationGateway::new(notification_url),
        broadcaster,
        notification,
        policy,
    )
    .spawn(queue_rx);

    let (publish_queue, _worker) = PublishQueue::start(broker, policy);

    let service = ReservationService::new(
        store,
        HttpTableGateway::new(table_url),
        HttpRestaurantGateway::new(restaurant_url),
        publish_queue,
    );

    Arc::new(AppState {
        reservations: service,
    })
}
