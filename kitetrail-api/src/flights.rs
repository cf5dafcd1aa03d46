use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use kitetrail_domain::flight::Flight;
use serde_json::{json, Value};
use tokio_stream::wrappers::BroadcastStream;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights", get(list_flights))
        .route("/api/flights/{flight_id}", get(get_flight))
        .route(
            "/api/flights/{flight_id}/seats/{seat_id}/select",
            post(select_seat),
        )
        .route(
            "/api/flights/{flight_id}/seats/{seat_id}/deselect",
            post(deselect_seat),
        )
        .route("/api/flights/{flight_id}/events", get(seat_events))
}

async fn list_flights(State(state): State<AppState>) -> Json<Vec<Flight>> {
    let manager = state.manager.read().await;
    Json(manager.list_flights())
}

async fn get_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> Result<Json<Flight>, ApiError> {
    let manager = state.manager.read().await;
    let flight = manager.get_flight(&flight_id)?.clone();
    Ok(Json(flight))
}

async fn select_seat(
    State(state): State<AppState>,
    Path((flight_id, seat_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut manager = state.manager.write().await;
    manager.select_seat(&flight_id, &seat_id)?;

    let seat = manager.get_seat(&flight_id, &seat_id)?.clone();
    state.commit_effects(&manager, &flight_id, &seat);
    Ok(Json(json!({ "status": "ok", "seat": seat })))
}

async fn deselect_seat(
    State(state): State<AppState>,
    Path((flight_id, seat_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut manager = state.manager.write().await;
    manager.cancel_selection(&flight_id, &seat_id)?;

    let seat = manager.get_seat(&flight_id, &seat_id)?.clone();
    state.commit_effects(&manager, &flight_id, &seat);
    Ok(Json(json!({ "status": "ok", "seat": seat })))
}

/// Live per-flight seat updates for the monitoring view.
async fn seat_events(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    {
        let manager = state.manager.read().await;
        manager.get_flight(&flight_id)?;
    }

    let rx = state.events_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let flight_id = flight_id.clone();
        async move {
            match result {
                Ok(event) if event.flight_id == flight_id => {
                    let data = serde_json::to_string(&event).unwrap_or_default();
                    Some(Ok(Event::default().event("seat_update").data(data)))
                }
                _ => None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
