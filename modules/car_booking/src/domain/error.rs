use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::ReservationStatus;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Car not found: {id}")]
    CarNotFound { id: Uuid },

    #[error("Invalid rental interval [{start}, {end}): {reason}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        reason: String,
    },

    #[error("Car {car_id} is not available for the selected dates")]
    Unavailable { car_id: Uuid },

    #[error("Reservation {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Reservation not found: {id}")]
    ReservationNotFound { id: Uuid },

    #[error("Persistence failed: {message}")]
    PersistenceFailed { message: String },
}

impl DomainError {
    pub fn car_not_found(id: Uuid) -> Self {
        Self::CarNotFound { id }
    }

    pub fn invalid_interval(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInterval {
            start,
            end,
            reason: reason.into(),
        }
    }

    pub fn unavailable(car_id: Uuid) -> Self {
        Self::Unavailable { car_id }
    }

    pub fn invalid_transition(id: Uuid, from: ReservationStatus, to: ReservationStatus) -> Self {
        Self::InvalidTransition { id, from, to }
    }

    pub fn reservation_not_found(id: Uuid) -> Self {
        Self::ReservationNotFound { id }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceFailed {
            message: message.into(),
        }
    }
}
