use std::collections::HashMap;

use kitetrail_domain::flight::{Flight, Seat, SeatStatus};
use tracing::debug;

use crate::{BookingError, BookingResult};

/// Permitted rows of the seat-status table. Everything else is rejected,
/// including re-booking an occupied seat (`taken -> taken`).
fn transition_allowed(from: SeatStatus, to: SeatStatus) -> bool {
    matches!(
        (from, to),
        (SeatStatus::Available, SeatStatus::Selected)
            | (SeatStatus::Selected, SeatStatus::Available)
            | (SeatStatus::Selected, SeatStatus::Taken)
            | (SeatStatus::Taken, SeatStatus::Available)
    )
}

/// Owns the flight/seat state and is the single writer for it. All per-seat
/// mutations funnel through `apply_status`, which re-validates the transition
/// table before touching anything, so a rejected request leaves no partial
/// state behind.
pub struct FlightRepository {
    flights: HashMap<String, Flight>,
}

impl FlightRepository {
    pub fn new(flights: Vec<Flight>) -> Self {
        let flights = flights.into_iter().map(|f| (f.id.clone(), f)).collect();
        Self { flights }
    }

    /// Snapshot of all flights, sorted by id so listings are deterministic.
    pub fn list_flights(&self) -> Vec<Flight> {
        let mut flights: Vec<Flight> = self.flights.values().cloned().collect();
        flights.sort_by(|a, b| a.id.cmp(&b.id));
        flights
    }

    pub fn get_flight(&self, flight_id: &str) -> BookingResult<&Flight> {
        self.flights
            .get(flight_id)
            .ok_or_else(|| BookingError::FlightNotFound(flight_id.to_string()))
    }

    pub fn get_seat(&self, flight_id: &str, seat_id: &str) -> BookingResult<&Seat> {
        self.get_flight(flight_id)?
            .seat(seat_id)
            .ok_or_else(|| BookingError::SeatNotFound {
                flight_id: flight_id.to_string(),
                seat_id: seat_id.to_string(),
            })
    }

    /// The at-most-one seat currently selected on the given flight.
    pub fn selected_seat(&self, flight_id: &str) -> BookingResult<Option<&Seat>> {
        Ok(self.get_flight(flight_id)?.selected_seat())
    }

    /// The only mutation entry point. Validates the requested transition and
    /// the passenger-name rule, then applies it. Applying `selected` reverts
    /// any other selected seat on the same flight first, so the last
    /// selection always wins without the caller issuing a deselect.
    pub fn apply_status(
        &mut self,
        flight_id: &str,
        seat_id: &str,
        new_status: SeatStatus,
        passenger_name: Option<&str>,
    ) -> BookingResult<()> {
        let current = self.get_seat(flight_id, seat_id)?.status;

        if !transition_allowed(current, new_status) {
            return Err(BookingError::InvalidTransition {
                from: current,
                to: new_status,
            });
        }

        match (new_status, passenger_name) {
            (SeatStatus::Taken, None) => {
                return Err(BookingError::Validation(
                    "a passenger name is required to take a seat".to_string(),
                ))
            }
            (SeatStatus::Taken, Some(_)) => {}
            (_, Some(_)) => {
                return Err(BookingError::Validation(
                    "a passenger name is only valid on a taken seat".to_string(),
                ))
            }
            (_, None) => {}
        }

        let flight = self
            .flights
            .get_mut(flight_id)
            .ok_or_else(|| BookingError::FlightNotFound(flight_id.to_string()))?;

        if new_status == SeatStatus::Selected {
            if let Some(prev) = flight
                .seats
                .iter_mut()
                .find(|s| s.status == SeatStatus::Selected && s.id != seat_id)
            {
                debug!("Reverting prior selection {} on flight {}", prev.id, flight_id);
                prev.status = SeatStatus::Available;
                prev.passenger_name = None;
            }
        }

        let seat = flight
            .seat_mut(seat_id)
            .ok_or_else(|| BookingError::SeatNotFound {
                flight_id: flight_id.to_string(),
                seat_id: seat_id.to_string(),
            })?;

        seat.status = new_status;
        seat.passenger_name = match new_status {
            SeatStatus::Taken => passenger_name.map(str::to_string),
            _ => None,
        };

        Ok(())
    }
}
