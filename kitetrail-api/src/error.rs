use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kitetrail_core::BookingError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Booking(BookingError),
    Internal(anyhow::Error),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        Self::Booking(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Booking(err) => (booking_status(&err), err.to_string()),
            ApiError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}

fn booking_status(err: &BookingError) -> StatusCode {
    match err {
        BookingError::FlightNotFound(_) | BookingError::SeatNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        BookingError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BookingError::SeatUnavailable(_)
        | BookingError::SeatAlreadyTaken(_)
        | BookingError::SeatNotBooked(_) => StatusCode::CONFLICT,
        BookingError::Validation(_) => StatusCode::BAD_REQUEST,
        BookingError::Transport(_) => StatusCode::BAD_GATEWAY,
    }
}
