use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use kitetrail_api::{app, AppState};
use kitetrail_core::booking::BookingManager;
use kitetrail_core::repository::FlightRepository;
use kitetrail_core::sync::{NullSeatSync, SeatSync};
use kitetrail_domain::seed;
use kitetrail_store::{app_config::Config, HttpSeatSync, SnapshotStore};
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitetrail_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Kitetrail API on port {}", config.server.port);

    let snapshot = SnapshotStore::new(&config.storage.dir, &config.storage.namespace);
    let flights = match snapshot.load() {
        Ok(Some(flights)) => {
            tracing::info!(
                "Restored {} flights from {}",
                flights.len(),
                snapshot.path().display()
            );
            flights
        }
        Ok(None) => seed::seed_flights(),
        Err(e) => {
            tracing::warn!("Snapshot unreadable ({}), falling back to seed data", e);
            seed::seed_flights()
        }
    };

    let manager = BookingManager::new(FlightRepository::new(flights));

    let sync: Arc<dyn SeatSync> = match &config.sync.remote_url {
        Some(url) => {
            tracing::info!("Remote sync enabled against {}", url);
            let timeout = Duration::from_secs(config.sync.request_timeout_seconds);
            Arc::new(
                HttpSeatSync::new(url.clone(), timeout)
                    .expect("Failed to build remote sync client"),
            )
        }
        None => Arc::new(NullSeatSync),
    };

    // Seat-event broadcast for the monitoring stream
    let (events_tx, _) = tokio::sync::broadcast::channel(100);

    let state = AppState {
        manager: Arc::new(RwLock::new(manager)),
        snapshot: Arc::new(snapshot),
        sync,
        events_tx,
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
