use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::CarBookingApi,
    error::CarBookingError,
    model::{Car, NewCar, NewReservation, Reservation, ReservationStatus},
};
use crate::domain::service::BookingAdmission;

/// Local implementation of the CarBookingApi trait that delegates to the domain service
pub struct CarBookingLocalClient {
    service: Arc<BookingAdmission>,
}

impl CarBookingLocalClient {
    pub fn new(service: Arc<BookingAdmission>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CarBookingApi for CarBookingLocalClient {
    async fn try_book(&self, request: NewReservation) -> Result<Reservation, CarBookingError> {
        self.service.try_book(request).await.map_err(Into::into)
    }

    async fn cancel(&self, id: Uuid) -> Result<Reservation, CarBookingError> {
        self.service.cancel(id).await.map_err(Into::into)
    }

    async fn cancel_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Reservation, CarBookingError> {
        self.service
            .cancel_for_user(id, user_id)
            .await
            .map_err(Into::into)
    }

    async fn transition(
        &self,
        id: Uuid,
        next: ReservationStatus,
    ) -> Result<Reservation, CarBookingError> {
        self.service.transition(id, next).await.map_err(Into::into)
    }

    async fn update_notes(
        &self,
        id: Uuid,
        notes: Option<String>,
    ) -> Result<Reservation, CarBookingError> {
        self.service
            .update_notes(id, notes)
            .await
            .map_err(Into::into)
    }

    async fn update_notes_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<Reservation, CarBookingError> {
        self.service
            .update_notes_for_user(id, user_id, notes)
            .await
            .map_err(Into::into)
    }

    async fn get_reservation(&self, id: Uuid) -> Result<Reservation, CarBookingError> {
        self.service.get_reservation(id).await.map_err(Into::into)
    }

    async fn list_user_reservations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Reservation>, CarBookingError> {
        self.service
            .list_user_reservations(user_id)
            .await
            .map_err(Into::into)
    }

    async fn count_reservations(&self) -> Result<u64, CarBookingError> {
        self.service.count_reservations().await.map_err(Into::into)
    }

    async fn register_car(&self, new_car: NewCar) -> Result<Car, CarBookingError> {
        self.service.register_car(new_car).await.map_err(Into::into)
    }
}
