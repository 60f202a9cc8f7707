use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::ReservationStatus;
use crate::errors::{self, ErrDef};

/// Errors that are safe to expose to other crates.
/// Every kind stays distinct so callers can render a precise message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarBookingError {
    #[error("Car not found: {id}")]
    CarNotFound { id: Uuid },

    #[error("Invalid rental interval: {message}")]
    InvalidInterval { message: String },

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

    #[error("Persistence failed")]
    PersistenceFailed,
}

impl CarBookingError {
    /// Catalog entry for this error kind.
    pub fn def(&self) -> &'static ErrDef {
        match self {
            Self::CarNotFound { .. } => &errors::CAR_NOT_FOUND,
            Self::InvalidInterval { .. } => &errors::INVALID_INTERVAL,
            Self::Unavailable { .. } => &errors::UNAVAILABLE,
            Self::InvalidTransition { .. } => &errors::INVALID_TRANSITION,
            Self::ReservationNotFound { .. } => &errors::RESERVATION_NOT_FOUND,
            Self::PersistenceFailed => &errors::PERSISTENCE_FAILED,
        }
    }

    pub fn status(&self) -> u16 {
        self.def().status
    }

    pub fn code(&self) -> &'static str {
        self.def().code
    }
}

impl From<crate::domain::error::DomainError> for CarBookingError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            CarNotFound { id } => Self::CarNotFound { id },
            InvalidInterval { start, end, reason } => Self::InvalidInterval {
                message: format!("[{start}, {end}): {reason}"),
            },
            Unavailable { car_id } => Self::Unavailable { car_id },
            InvalidTransition { id, from, to } => Self::InvalidTransition { id, from, to },
            ReservationNotFound { id } => Self::ReservationNotFound { id },
            // Storage details stay internal; they are logged by the service.
            PersistenceFailed { .. } => Self::PersistenceFailed,
        }
    }
}
