pub mod booking;
pub mod events;
pub mod flight;
pub mod pii;
pub mod seed;

pub use flight::{CabinLayout, Flight, Seat, SeatStatus};
