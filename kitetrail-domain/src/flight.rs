use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-seat lifecycle status. `Selected` is the transient in-progress choice
/// of the current session; `Taken` is a confirmed booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Taken,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Selected => "selected",
            SeatStatus::Taken => "taken",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An individually bookable unit within a flight's cabin.
///
/// Invariant: `passenger_name` is present exactly when `status` is `Taken`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub id: String,
    pub status: SeatStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_name: Option<String>,
}

impl Seat {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: SeatStatus::Available,
            passenger_name: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == SeatStatus::Available
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CabinLayout {
    pub rows: u32,
    pub seats_per_row: u32,
}

impl CabinLayout {
    pub fn capacity(&self) -> u32 {
        self.rows * self.seats_per_row
    }
}

/// A bookable route instance with a fixed seat layout. Immutable once seeded,
/// except for its seat collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price_amount: i32,
    pub price_currency: String,
    pub layout: CabinLayout,
    pub seats: Vec<Seat>,
}

impl Flight {
    pub fn seat(&self, seat_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    pub fn seat_mut(&mut self, seat_id: &str) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.id == seat_id)
    }

    /// The at-most-one seat currently marked as the session's selection.
    pub fn selected_seat(&self) -> Option<&Seat> {
        self.seats.iter().find(|s| s.status == SeatStatus::Selected)
    }

    pub fn taken_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.status == SeatStatus::Taken)
            .count()
    }
}

/// Splits a conventional seat label into its row number and column letter.
/// Returns `None` for ids that do not follow the `{row}{letter}` shape;
/// lookups elsewhere still accept such ids as opaque strings.
pub fn parse_seat_label(id: &str) -> Option<(u32, char)> {
    let letter = id.chars().last()?;
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let row_part = &id[..id.len() - 1];
    if row_part.is_empty() || !row_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: u32 = row_part.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row, letter))
}
