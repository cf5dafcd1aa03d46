use chrono::Utc;
use kitetrail_domain::booking::BookingConfirmation;
use kitetrail_domain::flight::{Flight, Seat, SeatStatus};
use tracing::info;
use uuid::Uuid;

use crate::repository::FlightRepository;
use crate::{BookingError, BookingResult};

/// Drives the per-seat state machine on top of an owned repository:
///
/// ```text
/// available --select--> selected --confirm--> taken
/// available <--cancel_selection-- selected
/// taken --cancel_booking--> available
/// any --reset_all_seats--> available
/// ```
///
/// The manager holds no state of its own; every mutation goes through the
/// repository's `apply_status` so its transition table has the final word.
pub struct BookingManager {
    repo: FlightRepository,
}

impl BookingManager {
    pub fn new(repo: FlightRepository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &FlightRepository {
        &self.repo
    }

    pub fn list_flights(&self) -> Vec<Flight> {
        self.repo.list_flights()
    }

    pub fn get_flight(&self, flight_id: &str) -> BookingResult<&Flight> {
        self.repo.get_flight(flight_id)
    }

    pub fn get_seat(&self, flight_id: &str, seat_id: &str) -> BookingResult<&Seat> {
        self.repo.get_seat(flight_id, seat_id)
    }

    /// Marks a seat as the session's selection. Selecting the seat that is
    /// already selected toggles it back to available; selecting a different
    /// seat implicitly reverts the previous selection.
    pub fn select_seat(&mut self, flight_id: &str, seat_id: &str) -> BookingResult<()> {
        let seat = self.repo.get_seat(flight_id, seat_id)?;
        match seat.status {
            SeatStatus::Taken => Err(BookingError::SeatUnavailable(seat_id.to_string())),
            SeatStatus::Selected => {
                self.repo
                    .apply_status(flight_id, seat_id, SeatStatus::Available, None)
            }
            SeatStatus::Available => {
                self.repo
                    .apply_status(flight_id, seat_id, SeatStatus::Selected, None)
            }
        }
    }

    /// Confirms the selected seat for a passenger. The seat must be in
    /// `selected` status; confirming straight from `available` is rejected
    /// and a seat taken in the meantime surfaces as `SeatAlreadyTaken`.
    pub fn confirm_booking(
        &mut self,
        flight_id: &str,
        seat_id: &str,
        passenger_name: &str,
    ) -> BookingResult<BookingConfirmation> {
        let passenger_name = passenger_name.trim();
        if passenger_name.is_empty() {
            return Err(BookingError::Validation(
                "passenger name must not be empty".to_string(),
            ));
        }

        let seat = self.repo.get_seat(flight_id, seat_id)?;
        if seat.status == SeatStatus::Taken {
            return Err(BookingError::SeatAlreadyTaken(seat_id.to_string()));
        }

        self.repo
            .apply_status(flight_id, seat_id, SeatStatus::Taken, Some(passenger_name))?;
        info!("Booking confirmed: flight {} seat {}", flight_id, seat_id);

        Ok(BookingConfirmation {
            reference: Uuid::new_v4(),
            flight_id: flight_id.to_string(),
            seat_id: seat_id.to_string(),
            passenger_name: passenger_name.to_string(),
            booked_at: Utc::now(),
        })
    }

    /// Reverts an in-progress selection. A seat that is already available is
    /// left alone, so callers may retry freely; a seat that got taken in the
    /// meantime is reported rather than silently released.
    pub fn cancel_selection(&mut self, flight_id: &str, seat_id: &str) -> BookingResult<()> {
        let seat = self.repo.get_seat(flight_id, seat_id)?;
        match seat.status {
            SeatStatus::Available => Ok(()),
            SeatStatus::Taken => Err(BookingError::SeatAlreadyTaken(seat_id.to_string())),
            SeatStatus::Selected => {
                self.repo
                    .apply_status(flight_id, seat_id, SeatStatus::Available, None)
            }
        }
    }

    /// Administrative cancellation of a confirmed booking. Frees the seat and
    /// clears its passenger name.
    pub fn cancel_booking(&mut self, flight_id: &str, seat_id: &str) -> BookingResult<()> {
        let seat = self.repo.get_seat(flight_id, seat_id)?;
        if seat.status != SeatStatus::Taken {
            return Err(BookingError::SeatNotBooked(seat_id.to_string()));
        }

        self.repo
            .apply_status(flight_id, seat_id, SeatStatus::Available, None)?;
        info!("Booking cancelled: flight {} seat {}", flight_id, seat_id);
        Ok(())
    }

    /// Administrative reset: every selected or taken seat reverts to
    /// available, optionally scoped to one flight. Each seat goes through
    /// `apply_status` individually; both reverting rows of the transition
    /// table are legal, so this cannot fail halfway.
    pub fn reset_all_seats(&mut self, flight_id: Option<&str>) -> BookingResult<()> {
        let targets: Vec<String> = match flight_id {
            Some(id) => {
                self.repo.get_flight(id)?;
                vec![id.to_string()]
            }
            None => self.repo.list_flights().into_iter().map(|f| f.id).collect(),
        };

        let mut reverted = 0usize;
        for fid in targets {
            let occupied: Vec<String> = self
                .repo
                .get_flight(&fid)?
                .seats
                .iter()
                .filter(|s| !s.is_available())
                .map(|s| s.id.clone())
                .collect();

            for sid in occupied {
                self.repo
                    .apply_status(&fid, &sid, SeatStatus::Available, None)?;
                reverted += 1;
            }
        }

        info!(
            "Seat reset complete: {} seats reverted (scope: {})",
            reverted,
            flight_id.unwrap_or("all flights")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kitetrail_domain::flight::CabinLayout;
    use kitetrail_domain::seed::generate_seats;

    fn manager() -> BookingManager {
        let layout = CabinLayout { rows: 15, seats_per_row: 6 };
        let flight = Flight {
            id: "KT123".to_string(),
            origin: "New York (JFK)".to_string(),
            destination: "London (LHR)".to_string(),
            departure_time: Utc::now(),
            arrival_time: Utc::now(),
            price_amount: 750,
            price_currency: "USD".to_string(),
            layout,
            seats: generate_seats(layout),
        };
        BookingManager::new(FlightRepository::new(vec![flight]))
    }

    #[test]
    fn test_select_then_confirm() {
        let mut manager = manager();

        manager.select_seat("KT123", "12A").unwrap();
        assert_eq!(manager.get_seat("KT123", "12A").unwrap().status, SeatStatus::Selected);

        let confirmation = manager.confirm_booking("KT123", "12A", "Jane Doe").unwrap();
        assert_eq!(confirmation.flight_id, "KT123");
        assert_eq!(confirmation.seat_id, "12A");
        assert_eq!(confirmation.passenger_name, "Jane Doe");

        let seat = manager.get_seat("KT123", "12A").unwrap();
        assert_eq!(seat.status, SeatStatus::Taken);
        assert_eq!(seat.passenger_name.as_deref(), Some("Jane Doe"));

        // the flight's selection is gone once the booking lands
        assert!(manager.repository().selected_seat("KT123").unwrap().is_none());
    }

    #[test]
    fn test_select_taken_seat_fails() {
        let mut manager = manager();
        manager.select_seat("KT123", "12A").unwrap();
        manager.confirm_booking("KT123", "12A", "Jane Doe").unwrap();

        assert!(matches!(
            manager.select_seat("KT123", "12A"),
            Err(BookingError::SeatUnavailable(_))
        ));
        let seat = manager.get_seat("KT123", "12A").unwrap();
        assert_eq!(seat.status, SeatStatus::Taken);
        assert_eq!(seat.passenger_name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_last_selection_wins() {
        let mut manager = manager();
        manager.select_seat("KT123", "12B").unwrap();
        manager.select_seat("KT123", "12A").unwrap();

        assert_eq!(manager.get_seat("KT123", "12A").unwrap().status, SeatStatus::Selected);
        assert!(manager.get_seat("KT123", "12B").unwrap().is_available());
    }

    #[test]
    fn test_reselecting_toggles_off() {
        let mut manager = manager();
        manager.select_seat("KT123", "12A").unwrap();
        manager.select_seat("KT123", "12A").unwrap();

        assert!(manager.get_seat("KT123", "12A").unwrap().is_available());
        assert!(manager.repository().selected_seat("KT123").unwrap().is_none());
    }

    #[test]
    fn test_confirm_requires_selection() {
        let mut manager = manager();

        assert!(matches!(
            manager.confirm_booking("KT123", "12A", "Jane Doe"),
            Err(BookingError::InvalidTransition {
                from: SeatStatus::Available,
                to: SeatStatus::Taken
            })
        ));
        assert!(manager.get_seat("KT123", "12A").unwrap().is_available());
    }

    #[test]
    fn test_confirm_rejects_blank_name() {
        let mut manager = manager();
        manager.select_seat("KT123", "12A").unwrap();

        assert!(matches!(
            manager.confirm_booking("KT123", "12A", "   "),
            Err(BookingError::Validation(_))
        ));
        assert_eq!(manager.get_seat("KT123", "12A").unwrap().status, SeatStatus::Selected);
    }

    #[test]
    fn test_confirm_lost_race_surfaces_as_already_taken() {
        let mut manager = manager();
        manager.select_seat("KT123", "12A").unwrap();
        manager.confirm_booking("KT123", "12A", "Jane Doe").unwrap();

        assert!(matches!(
            manager.confirm_booking("KT123", "12A", "John Roe"),
            Err(BookingError::SeatAlreadyTaken(_))
        ));
        let seat = manager.get_seat("KT123", "12A").unwrap();
        assert_eq!(seat.passenger_name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_cancel_selection_round_trip_and_idempotence() {
        let mut manager = manager();
        manager.select_seat("KT123", "12A").unwrap();

        manager.cancel_selection("KT123", "12A").unwrap();
        let seat = manager.get_seat("KT123", "12A").unwrap().clone();
        assert!(seat.is_available());
        assert!(seat.passenger_name.is_none());

        // a second cancel is a no-op, not an error
        manager.cancel_selection("KT123", "12A").unwrap();
        assert_eq!(manager.get_seat("KT123", "12A").unwrap(), &seat);
    }

    #[test]
    fn test_cancel_selection_on_taken_seat_is_rejected() {
        let mut manager = manager();
        manager.select_seat("KT123", "12A").unwrap();
        manager.confirm_booking("KT123", "12A", "Jane Doe").unwrap();

        assert!(matches!(
            manager.cancel_selection("KT123", "12A"),
            Err(BookingError::SeatAlreadyTaken(_))
        ));
        assert_eq!(manager.get_seat("KT123", "12A").unwrap().status, SeatStatus::Taken);
    }

    #[test]
    fn test_cancel_booking_frees_the_seat() {
        let mut manager = manager();
        manager.select_seat("KT123", "12A").unwrap();
        manager.confirm_booking("KT123", "12A", "Jane Doe").unwrap();

        manager.cancel_booking("KT123", "12A").unwrap();
        let seat = manager.get_seat("KT123", "12A").unwrap();
        assert!(seat.is_available());
        assert!(seat.passenger_name.is_none());
    }

    #[test]
    fn test_cancel_booking_requires_taken() {
        let mut manager = manager();

        assert!(matches!(
            manager.cancel_booking("KT123", "12A"),
            Err(BookingError::SeatNotBooked(_))
        ));

        manager.select_seat("KT123", "12A").unwrap();
        assert!(matches!(
            manager.cancel_booking("KT123", "12A"),
            Err(BookingError::SeatNotBooked(_))
        ));
    }

    #[test]
    fn test_reset_reverts_every_seat() {
        let mut manager = manager();
        for row in 1..=10 {
            let seat_id = format!("{}A", row);
            manager.select_seat("KT123", &seat_id).unwrap();
            manager.confirm_booking("KT123", &seat_id, "Jane Doe").unwrap();
        }
        manager.select_seat("KT123", "12C").unwrap();

        manager.reset_all_seats(Some("KT123")).unwrap();

        let flight = manager.get_flight("KT123").unwrap();
        assert!(flight.seats.iter().all(|s| s.is_available()));
        assert!(flight.seats.iter().all(|s| s.passenger_name.is_none()));
    }

    #[test]
    fn test_reset_unknown_flight() {
        let mut manager = manager();
        assert!(matches!(
            manager.reset_all_seats(Some("KT999")),
            Err(BookingError::FlightNotFound(_))
        ));
    }

    #[test]
    fn test_at_most_one_selected_after_any_sequence() {
        let mut manager = manager();
        let picks = ["1A", "2B", "2B", "3C", "4D", "3C", "5E"];
        for seat_id in picks {
            manager.select_seat("KT123", seat_id).unwrap();
        }

        let selected = manager
            .get_flight("KT123")
            .unwrap()
            .seats
            .iter()
            .filter(|s| s.status == SeatStatus::Selected)
            .count();
        assert!(selected <= 1);
    }
}
