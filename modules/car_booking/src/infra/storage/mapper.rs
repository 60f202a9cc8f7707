use anyhow::{anyhow, Context};
use sea_orm::Set;

use crate::contract::interval::RentalInterval;
use crate::contract::model::{Car, Reservation, ReservationStatus};
use crate::contract::money::Money;
use crate::infra::storage::entity::{car, reservation};

/// Convert a car row to a contract model
pub fn car_from_entity(m: car::Model) -> anyhow::Result<Car> {
    let daily_rate = Money::from_cents(m.daily_rate_cents)
        .with_context(|| format!("car {} has an invalid daily rate", m.id))?;
    Ok(Car {
        id: m.id,
        name: m.name,
        daily_rate,
    })
}

pub fn car_to_active(c: &Car) -> car::ActiveModel {
    car::ActiveModel {
        id: Set(c.id),
        name: Set(c.name.clone()),
        daily_rate_cents: Set(c.daily_rate.cents()),
    }
}

/// Convert a reservation row to a contract model.
/// Rows violating the model invariants are reported, not patched up.
pub fn reservation_from_entity(m: reservation::Model) -> anyhow::Result<Reservation> {
    let interval = RentalInterval::new(m.start_at, m.end_at)
        .with_context(|| format!("reservation {} has an invalid interval", m.id))?;
    let total_price = Money::from_cents(m.total_price_cents)
        .with_context(|| format!("reservation {} has an invalid price", m.id))?;
    let status: ReservationStatus = m
        .status
        .parse()
        .map_err(|e| anyhow!("reservation {}: {}", m.id, e))?;
    Ok(Reservation {
        id: m.id,
        car_id: m.car_id,
        user_id: m.user_id,
        interval,
        total_price,
        status,
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}
