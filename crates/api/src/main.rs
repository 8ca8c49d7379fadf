//! API server entry point.

use api::config::Config;
use reservation_store::PostgresReservationStore;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Build application state; remote gateways and the Postgres store
    //    are opted into via environment, in-memory otherwise
    let app = if config.remote_gateways_configured() {
        let table_url = config.table_service_url.clone().unwrap_or_default();
        let restaurant_url = config.restaurant_service_url.clone().unwrap_or_default();
        let notification_url = config.notification_service_url.clone().unwrap_or_default();

        if let Some(database_url) = &config.database_url {
            let pool = sqlx::PgPool::connect(database_url)
                .await
                .expect("failed to connect to database");
            let store = PostgresReservationStore::new(pool);
            store.run_migrations().await.expect("migrations failed");

            tracing::info!("using Postgres store and remote gateways");
            let state = api::create_remote_state(
                store,
                &table_url,
                &restaurant_url,
                &notification_url,
                config.notification.clone(),
            );
            api::create_app(state, metrics_handle)
        } else {
            tracing::info!("using in-memory store and remote gateways");
            let state = api::create_remote_state(
                reservation_store::InMemoryReservationStore::new(),
                &table_url,
                &restaurant_url,
                &notification_url,
                config.notification.clone(),
            );
            api::create_app(state, metrics_handle)
        }
    } else {
        tracing::info!("using in-memory store and gateways");
        let wiring = api::create_default_state(config.notification.clone());
        api::create_app(wiring.state, metrics_handle)
    };

    // 4. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
