use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Receipt handed back on a successful booking confirmation. Derived at
/// confirm time; the seat collection remains the record of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub reference: Uuid,
    pub flight_id: String,
    pub seat_id: String,
    pub passenger_name: String,
    pub booked_at: DateTime<Utc>,
}
