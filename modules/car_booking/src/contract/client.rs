use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::CarBookingError,
    model::{Car, NewCar, NewReservation, Reservation, ReservationStatus},
};

/// Public API trait for the car_booking module that other crates can use
#[async_trait]
pub trait CarBookingApi: Send + Sync {
    /// Admit a booking request and persist it as a pending reservation
    async fn try_book(&self, request: NewReservation) -> Result<Reservation, CarBookingError>;

    /// Cancel a pending or confirmed reservation
    async fn cancel(&self, id: Uuid) -> Result<Reservation, CarBookingError>;

    /// Cancel on behalf of the owning user; other users' reservations are not found
    async fn cancel_for_user(&self, id: Uuid, user_id: Uuid)
        -> Result<Reservation, CarBookingError>;

    /// Apply a status change allowed by the reservation state machine
    async fn transition(
        &self,
        id: Uuid,
        next: ReservationStatus,
    ) -> Result<Reservation, CarBookingError>;

    /// Replace the free-text notes
    async fn update_notes(
        &self,
        id: Uuid,
        notes: Option<String>,
    ) -> Result<Reservation, CarBookingError>;

    /// Replace the notes of a reservation owned by `user_id`
    async fn update_notes_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<Reservation, CarBookingError>;

    async fn get_reservation(&self, id: Uuid) -> Result<Reservation, CarBookingError>;

    /// Reservations of one user, newest first
    async fn list_user_reservations(&self, user_id: Uuid)
        -> Result<Vec<Reservation>, CarBookingError>;

    async fn count_reservations(&self) -> Result<u64, CarBookingError>;

    async fn register_car(&self, new_car: NewCar) -> Result<Car, CarBookingError>;
}
