pub mod booking;
pub mod repository;
pub mod sync;

use kitetrail_domain::flight::SeatStatus;

pub use booking::BookingManager;
pub use repository::FlightRepository;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Flight not found: {0}")]
    FlightNotFound(String),

    #[error("Seat {seat_id} not found on flight {flight_id}")]
    SeatNotFound { flight_id: String, seat_id: String },

    #[error("Invalid seat transition from {from} to {to}")]
    InvalidTransition { from: SeatStatus, to: SeatStatus },

    #[error("Seat {0} is already occupied")]
    SeatUnavailable(String),

    #[error("Seat {0} was booked by another passenger")]
    SeatAlreadyTaken(String),

    #[error("Seat {0} has no booking to cancel")]
    SeatNotBooked(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Remote sync failed: {0}")]
    Transport(String),
}

pub type BookingResult<T> = Result<T, BookingError>;
