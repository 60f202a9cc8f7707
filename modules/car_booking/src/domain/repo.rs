use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::{Car, Reservation, ReservationStatus};

/// Failure reported by a [`ReservationStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The storage layer refused the write because an active reservation for
    /// the same car overlaps it.
    #[error("overlapping active reservation exists for car {car_id}")]
    Conflict { car_id: Uuid },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Port for the domain layer: read access to the car catalog.
#[async_trait]
pub trait CarCatalog: Send + Sync {
    /// Load a car by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Car>>;
    /// Insert a fully-formed car.
    async fn insert(&self, car: Car) -> anyhow::Result<()>;
}

/// Port for the domain layer: persistence of reservations.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// All pending/confirmed reservations of a car, current at call time.
    async fn find_active_by_car_id(&self, car_id: Uuid) -> Result<Vec<Reservation>, StoreError>;

    /// Insert a fully-formed reservation.
    ///
    /// Service computes id/price/timestamps; the store persists. Stores that
    /// can enforce exclusion atomically return [`StoreError::Conflict`].
    async fn create(&self, reservation: Reservation) -> Result<(), StoreError>;

    /// Compare-and-set on status: applies `next` only if the stored status is
    /// still `expected`. `None` when no such row exists.
    async fn update_status(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        next: ReservationStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, StoreError>;

    /// Replace notes. `None` when the reservation does not exist.
    async fn update_notes(
        &self,
        id: Uuid,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StoreError>;

    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Reservation>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
