use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::ReservationStatus;

/// Transport-agnostic domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationDomainEvent {
    Created {
        id: Uuid,
        car_id: Uuid,
        at: DateTime<Utc>,
    },
    StatusChanged {
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        at: DateTime<Utc>,
    },
}
