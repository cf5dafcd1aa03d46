use axum::{extract::State, routing::post, Json, Router};
use kitetrail_core::sync::{BookingSyncRequest, CancellationSyncRequest, SyncError};
use kitetrail_core::BookingError;
use kitetrail_domain::booking::BookingConfirmation;
use kitetrail_domain::flight::SeatStatus;
use kitetrail_domain::pii::Masked;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_id: String,
    pub seat_id: String,
    pub passenger_name: Masked<String>,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    status: String,
    booking: BookingConfirmation,
}

#[derive(Debug, Deserialize)]
pub struct CancelBookingRequest {
    pub flight_id: String,
    pub seat_id: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/cancel", post(cancel_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let passenger_name = req.passenger_name.into_inner();
    let mut manager = state.manager.write().await;

    // Validate locally first so a request the state machine would refuse
    // never reaches the remote service.
    let seat = manager.get_seat(&req.flight_id, &req.seat_id)?;
    match seat.status {
        SeatStatus::Taken => {
            return Err(BookingError::SeatAlreadyTaken(req.seat_id.clone()).into())
        }
        SeatStatus::Available => {
            return Err(BookingError::InvalidTransition {
                from: SeatStatus::Available,
                to: SeatStatus::Taken,
            }
            .into())
        }
        SeatStatus::Selected => {}
    }
    if passenger_name.trim().is_empty() {
        return Err(
            BookingError::Validation("passenger name must not be empty".to_string()).into(),
        );
    }

    // The remote service arbitrates conflicts; a rejection here means another
    // client took the seat between selection and confirmation.
    let wire = BookingSyncRequest {
        flight_id: req.flight_id.clone(),
        seat_id: req.seat_id.clone(),
        passenger_name: passenger_name.clone(),
    };
    state.sync.push_booking(&wire).await.map_err(|e| match e {
        SyncError::Rejected(_) => BookingError::SeatAlreadyTaken(req.seat_id.clone()),
        SyncError::Transport(msg) => BookingError::Transport(msg),
    })?;

    let booking = manager.confirm_booking(&req.flight_id, &req.seat_id, &passenger_name)?;
    let seat = manager.get_seat(&req.flight_id, &req.seat_id)?.clone();
    state.commit_effects(&manager, &req.flight_id, &seat);

    info!(
        "Booking {} confirmed: flight {} seat {}",
        booking.reference, req.flight_id, req.seat_id
    );

    Ok(Json(BookingResponse {
        status: "ok".to_string(),
        booking,
    }))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut manager = state.manager.write().await;

    let seat = manager.get_seat(&req.flight_id, &req.seat_id)?;
    if seat.status != SeatStatus::Taken {
        return Err(BookingError::SeatNotBooked(req.seat_id.clone()).into());
    }

    let wire = CancellationSyncRequest {
        flight_id: req.flight_id.clone(),
        seat_id: req.seat_id.clone(),
    };
    state
        .sync
        .push_cancellation(&wire)
        .await
        .map_err(|e| match e {
            SyncError::Rejected(_) => BookingError::SeatNotBooked(req.seat_id.clone()),
            SyncError::Transport(msg) => BookingError::Transport(msg),
        })?;

    manager.cancel_booking(&req.flight_id, &req.seat_id)?;
    let seat = manager.get_seat(&req.flight_id, &req.seat_id)?.clone();
    state.commit_effects(&manager, &req.flight_id, &seat);

    info!(
        "Booking cancelled: flight {} seat {}",
        req.flight_id, req.seat_id
    );

    Ok(Json(json!({ "status": "ok" })))
}
