use chrono::{DateTime, TimeZone, Utc};

use crate::flight::{CabinLayout, Flight, Seat};

/// Builds the ordered seat collection for a cabin layout. Column letters run
/// from `A`, so a six-abreast cabin produces `1A`..`1F`, `2A`.. and so on.
pub fn generate_seats(layout: CabinLayout) -> Vec<Seat> {
    let mut seats = Vec::with_capacity(layout.capacity() as usize);
    for row in 1..=layout.rows {
        for col in 0..layout.seats_per_row {
            let letter = (b'A' + col as u8) as char;
            seats.push(Seat::new(format!("{}{}", row, letter)));
        }
    }
    seats
}

/// The demo fleet. Every seat starts out available; persisted snapshots
/// override this at startup.
pub fn seed_flights() -> Vec<Flight> {
    vec![
        demo_flight(
            "KT123",
            "New York (JFK)",
            "London (LHR)",
            ts(2024, 10, 28, 8, 0),
            ts(2024, 10, 28, 20, 0),
            750,
            CabinLayout { rows: 15, seats_per_row: 6 },
        ),
        demo_flight(
            "KT456",
            "Paris (CDG)",
            "Tokyo (HND)",
            ts(2024, 10, 29, 14, 30),
            ts(2024, 10, 30, 9, 0),
            1200,
            CabinLayout { rows: 20, seats_per_row: 6 },
        ),
        demo_flight(
            "KT789",
            "Sydney (SYD)",
            "Los Angeles (LAX)",
            ts(2024, 11, 1, 22, 0),
            ts(2024, 11, 1, 17, 0),
            980,
            CabinLayout { rows: 18, seats_per_row: 6 },
        ),
    ]
}

fn demo_flight(
    id: &str,
    origin: &str,
    destination: &str,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    price_amount: i32,
    layout: CabinLayout,
) -> Flight {
    Flight {
        id: id.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        departure_time,
        arrival_time,
        price_amount,
        price_currency: "USD".to_string(),
        layout,
        seats: generate_seats(layout),
    }
}

fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}
