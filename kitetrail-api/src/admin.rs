use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use kitetrail_core::sync::SyncError;
use kitetrail_core::BookingError;
use kitetrail_domain::flight::Flight;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FlightOccupancy {
    pub flight_id: String,
    pub origin: String,
    pub destination: String,
    pub total_seats: usize,
    pub taken_seats: usize,
    pub available_seats: usize,
    pub selected_seat: Option<String>,
    pub occupants: Vec<SeatOccupant>,
}

#[derive(Debug, Serialize)]
pub struct SeatOccupant {
    pub seat_id: String,
    pub passenger_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub flight_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/summary", get(summary))
        .route("/api/admin/reset", post(reset_seats))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/admin/summary — per-flight occupancy for the monitoring view.
async fn summary(State(state): State<AppState>) -> Json<Vec<FlightOccupancy>> {
    let manager = state.manager.read().await;
    let report: Vec<FlightOccupancy> = manager.list_flights().iter().map(occupancy).collect();
    Json(report)
}

/// POST /api/admin/reset — revert every seat to available, optionally scoped
/// to one flight.
async fn reset_seats(
    State(state): State<AppState>,
    Json(req): Json<ResetRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut manager = state.manager.write().await;

    state
        .sync
        .push_reset(req.flight_id.as_deref())
        .await
        .map_err(|e| match e {
            SyncError::Rejected(msg) | SyncError::Transport(msg) => BookingError::Transport(msg),
        })?;

    manager.reset_all_seats(req.flight_id.as_deref())?;
    state.persist(&manager);

    info!(
        "Seat reset applied (scope: {})",
        req.flight_id.as_deref().unwrap_or("all flights")
    );
    Ok(Json(json!({ "status": "ok" })))
}

fn occupancy(flight: &Flight) -> FlightOccupancy {
    let taken = flight.taken_count();
    FlightOccupancy {
        flight_id: flight.id.clone(),
        origin: flight.origin.clone(),
        destination: flight.destination.clone(),
        total_seats: flight.seats.len(),
        taken_seats: taken,
        available_seats: flight.seats.len() - taken,
        selected_seat: flight.selected_seat().map(|s| s.id.clone()),
        occupants: flight
            .seats
            .iter()
            .filter_map(|s| {
                s.passenger_name.as_ref().map(|name| SeatOccupant {
                    seat_id: s.id.clone(),
                    passenger_name: name.clone(),
                })
            })
            .collect(),
    }
}
