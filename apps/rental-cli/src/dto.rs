use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use car_booking::contract::{Car, CarBookingError, Reservation};

/// Output DTO for a catalog car
#[derive(Debug, Clone, Serialize)]
pub struct CarDto {
    pub id: Uuid,
    pub name: String,
    pub daily_rate: String,
}

/// Output DTO for a reservation
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDto {
    pub id: Uuid,
    pub car_id: Uuid,
    pub user_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub billable_days: i64,
    pub total_price: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationListDto {
    pub reservations: Vec<ReservationDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsDto {
    pub reservations: u64,
}

/// Error body printed to stderr when a booking operation is refused
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDto {
    pub status: u16,
    pub code: &'static str,
    pub title: &'static str,
    pub detail: String,
}

impl From<Car> for CarDto {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            name: car.name,
            daily_rate: car.daily_rate.to_string(),
        }
    }
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            car_id: r.car_id,
            user_id: r.user_id,
            start: r.interval.start(),
            end: r.interval.end(),
            billable_days: r.interval.billable_days(),
            total_price: r.total_price.to_string(),
            status: r.status.to_string(),
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<Vec<Reservation>> for ReservationListDto {
    fn from(items: Vec<Reservation>) -> Self {
        let reservations: Vec<ReservationDto> = items.into_iter().map(Into::into).collect();
        Self {
            total: reservations.len(),
            reservations,
        }
    }
}

impl From<&CarBookingError> for ErrorDto {
    fn from(err: &CarBookingError) -> Self {
        let def = err.def();
        Self {
            status: def.status,
            code: def.code,
            title: def.title,
            detail: err.to_string(),
        }
    }
}
