use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::flight::{Seat, SeatStatus};

/// Emitted after every committed seat mutation so monitoring clients can
/// follow occupancy live instead of polling.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeatEvent {
    pub flight_id: String,
    pub seat_id: String,
    pub status: SeatStatus,
    pub passenger_name: Option<String>,
    pub occurred_at: i64,
}

impl SeatEvent {
    pub fn now(flight_id: &str, seat: &Seat) -> Self {
        Self {
            flight_id: flight_id.to_string(),
            seat_id: seat.id.clone(),
            status: seat.status,
            passenger_name: seat.passenger_name.clone(),
            occurred_at: Utc::now().timestamp(),
        }
    }
}
