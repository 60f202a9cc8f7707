pub mod client;
pub mod error;
pub mod interval;
pub mod model;
pub mod money;

pub use client::CarBookingApi;
pub use error::CarBookingError;
pub use interval::{IntervalError, RentalInterval};
pub use model::{Car, NewCar, NewReservation, Reservation, ReservationStatus};
pub use money::{Money, MoneyError};
