use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::interval::RentalInterval;
use super::money::Money;

/// Lifecycle of a reservation.
///
/// `Pending -> {Confirmed, Cancelled}`, `Confirmed -> {Completed, Cancelled}`;
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    /// Statuses that block overlapping bookings.
    pub const ACTIVE: [ReservationStatus; 2] =
        [ReservationStatus::Pending, ReservationStatus::Confirmed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown reservation status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ReservationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Car as seen by the booking core (read-only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub daily_rate: Money,
}

/// Data for registering a car in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub name: String,
    pub daily_rate: Money,
}

/// Admitted booking. Interval and price are fixed at creation; only status
/// and notes change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: Uuid,
    pub car_id: Uuid,
    pub user_id: Uuid,
    pub interval: RentalInterval,
    pub total_price: Money,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking request. Bounds are raw: validation happens on admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub car_id: Uuid,
    pub user_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    const ALL: [ReservationStatus; 4] = [Pending, Confirmed, Cancelled, Completed];

    #[test]
    fn state_machine_edges() {
        let allowed = [
            (Pending, Confirmed),
            (Pending, Cancelled),
            (Confirmed, Completed),
            (Confirmed, Cancelled),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn terminal_states_reject_everything() {
        for to in ALL {
            assert!(!Cancelled.can_transition_to(to));
            assert!(!Completed.can_transition_to(to));
        }
        assert!(Cancelled.is_terminal() && Completed.is_terminal());
        assert!(!Pending.is_terminal() && !Confirmed.is_terminal());
    }

    #[test]
    fn only_pending_and_confirmed_are_active() {
        let active: Vec<_> = ALL.into_iter().filter(|s| s.is_active()).collect();
        assert_eq!(active, ReservationStatus::ACTIVE.to_vec());
    }

    #[test]
    fn status_string_form() {
        for s in ALL {
            assert_eq!(s.as_str().parse::<ReservationStatus>().unwrap(), s);
        }
        assert_eq!(
            "archived".parse::<ReservationStatus>(),
            Err(UnknownStatus("archived".to_string()))
        );
    }
}
