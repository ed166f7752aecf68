//! Ticket service HTTP server.

use event_service::client::HttpEventClient;
use metrics_exporter_prometheus::PrometheusBuilder;
use notification_service::client::HttpNotificationClient;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use ticket_service::{
    api::{AppState, build_router},
    config::Config,
    notifier::Notifier,
    service::TicketService,
    store::PostgresTicketStore,
};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticket_service=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ticket Service");

    let config = Config::from_env();
    info!(
        host = %config.server.host,
        port = config.server.port,
        event_service = %config.upstream.event_service_url,
        notification_service = %config.upstream.notification_service_url,
        "Configuration loaded"
    );

    let prometheus_handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!(
        "ticketing_purchases_total",
        "Total number of purchase attempts by outcome"
    );
    metrics::describe_counter!(
        "ticketing_notifications_dropped_total",
        "Notification jobs dropped because the dispatch queue was full"
    );
    metrics::describe_counter!(
        "ticketing_notifications_failed_total",
        "Notification jobs that failed downstream delivery"
    );

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database connected and migrated");

    let call_timeout = Duration::from_secs(config.upstream.call_timeout);
    let events = Arc::new(HttpEventClient::new(
        &config.upstream.event_service_url,
        call_timeout,
    )?);
    let notifications = Arc::new(HttpNotificationClient::new(
        &config.upstream.notification_service_url,
        call_timeout,
    )?);

    let (notifier, notifier_worker) =
        Notifier::spawn(notifications, config.notifier.queue_capacity);

    let store = Arc::new(PostgresTicketStore::new(Arc::new(pool)));
    let service = Arc::new(TicketService::new(store, events, notifier));

    let app = build_router(AppState { api: service })
        .route(
            "/metrics",
            axum::routing::get(move || {
                let handle = prometheus_handle.clone();
                async move { handle.render() }
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout,
        )));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Ticket service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last Notifier handle) is gone; let the
    // dispatch worker drain the queue before exiting.
    notifier_worker.await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
