use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::interval::RentalInterval;
use crate::contract::money::Money;
use crate::contract::model::{Car, NewCar, NewReservation, Reservation, ReservationStatus};
use crate::domain::error::DomainError;
use crate::domain::events::ReservationDomainEvent;
use crate::domain::locks::CarLocks;
use crate::domain::ports::EventPublisher;
use crate::domain::repo::{CarCatalog, ReservationStore, StoreError};

/// Booking admission: decides whether a rental request may become a
/// reservation, prices it, and drives reservation status changes.
///
/// Depends only on the catalog/store ports, not on infra types. Owns no
/// persistent state besides the in-process per-car lock registry.
#[derive(Clone)]
pub struct BookingAdmission {
    cars: Arc<dyn CarCatalog>,
    reservations: Arc<dyn ReservationStore>,
    events: Arc<dyn EventPublisher<ReservationDomainEvent>>,
    locks: Arc<CarLocks>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Longest bookable rental in billable days; `None` means unlimited.
    pub max_rental_days: Option<u32>,
    /// Upper bound on waiting for a car's admission lock.
    pub lock_timeout: Duration,
    /// Idle per-car locks are dropped once the registry grows past this size.
    pub lock_registry_soft_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_rental_days: None,
            lock_timeout: Duration::from_secs(5),
            lock_registry_soft_limit: 1024,
        }
    }
}

impl BookingAdmission {
    /// Create a service with dependencies.
    pub fn new(
        cars: Arc<dyn CarCatalog>,
        reservations: Arc<dyn ReservationStore>,
        events: Arc<dyn EventPublisher<ReservationDomainEvent>>,
        config: ServiceConfig,
    ) -> Self {
        let locks = Arc::new(CarLocks::new(config.lock_timeout));
        Self {
            cars,
            reservations,
            events,
            locks,
            config,
        }
    }

    #[instrument(
        name = "car_booking.service.try_book",
        skip(self, request),
        fields(car_id = %request.car_id, user_id = %request.user_id)
    )]
    pub async fn try_book(&self, request: NewReservation) -> Result<Reservation, DomainError> {
        info!("Admitting booking request");

        // Malformed intervals never reach the collaborators.
        let interval = RentalInterval::new(request.start, request.end).map_err(|e| {
            DomainError::invalid_interval(e.start, e.end, "end must be after start")
        })?;
        let days = interval.billable_days();
        if let Some(max) = self.config.max_rental_days {
            if days > i64::from(max) {
                return Err(DomainError::invalid_interval(
                    interval.start(),
                    interval.end(),
                    format!("{days} days exceeds the maximum rental of {max} days"),
                ));
            }
        }

        let car = self
            .cars
            .find_by_id(request.car_id)
            .await
            .map_err(|e| persistence_failure("car lookup", e))?
            .ok_or_else(|| DomainError::car_not_found(request.car_id))?;

        let total_price = car.daily_rate.checked_mul(days).ok_or_else(|| {
            DomainError::invalid_interval(
                interval.start(),
                interval.end(),
                "rental period too long to price",
            )
        })?;

        let guard = self
            .locks
            .acquire(car.id)
            .await
            .map_err(|e| persistence_failure("admission lock", e))?;
        let admitted = self.admit(&car, interval, total_price, request).await;
        drop(guard);
        if self.locks.len() > self.config.lock_registry_soft_limit {
            self.locks.prune();
        }
        let reservation = admitted?;

        self.events.publish(&ReservationDomainEvent::Created {
            id: reservation.id,
            car_id: reservation.car_id,
            at: reservation.created_at,
        });

        info!(
            "Created reservation id={} days={} total_price={}",
            reservation.id, days, reservation.total_price
        );
        Ok(reservation)
    }

    /// Number of per-car locks currently registered.
    pub fn lock_registry_len(&self) -> usize {
        self.locks.len()
    }

    /// Overlap check and insert; the caller holds the car's lock.
    async fn admit(
        &self,
        car: &Car,
        interval: RentalInterval,
        total_price: Money,
        request: NewReservation,
    ) -> Result<Reservation, DomainError> {
        let active = self
            .reservations
            .find_active_by_car_id(car.id)
            .await
            .map_err(|e| store_failure("active reservation lookup", e))?;
        debug!("Checking {} active reservations for overlap", active.len());

        if let Some(conflict) = active
            .iter()
            .find(|r| r.status.is_active() && r.interval.overlaps(&interval))
        {
            warn!(conflicting_id = %conflict.id, "Booking rejected: car unavailable");
            return Err(DomainError::unavailable(car.id));
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            car_id: car.id,
            user_id: request.user_id,
            interval,
            total_price,
            status: ReservationStatus::Pending,
            notes: normalize_notes(request.notes),
            created_at: now,
            updated_at: now,
        };

        self.reservations
            .create(reservation.clone())
            .await
            .map_err(|e| store_failure("reservation insert", e))?;
        Ok(reservation)
    }

    #[instrument(name = "car_booking.service.cancel", skip(self), fields(reservation_id = %id))]
    pub async fn cancel(&self, id: Uuid) -> Result<Reservation, DomainError> {
        info!("Cancelling reservation");
        let current = self.load(id).await?;
        self.apply_transition(current, ReservationStatus::Cancelled)
            .await
    }

    #[instrument(
        name = "car_booking.service.cancel_for_user",
        skip(self),
        fields(reservation_id = %id, user_id = %user_id)
    )]
    pub async fn cancel_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Reservation, DomainError> {
        info!("Cancelling reservation on behalf of user");
        let current = self.load(id).await?;
        if current.user_id != user_id {
            debug!("Reservation belongs to another user");
            return Err(DomainError::reservation_not_found(id));
        }
        self.apply_transition(current, ReservationStatus::Cancelled)
            .await
    }

    #[instrument(
        name = "car_booking.service.transition",
        skip(self),
        fields(reservation_id = %id, next = %next)
    )]
    pub async fn transition(
        &self,
        id: Uuid,
        next: ReservationStatus,
    ) -> Result<Reservation, DomainError> {
        info!("Changing reservation status");
        let current = self.load(id).await?;
        self.apply_transition(current, next).await
    }

    pub async fn confirm(&self, id: Uuid) -> Result<Reservation, DomainError> {
        self.transition(id, ReservationStatus::Confirmed).await
    }

    pub async fn complete(&self, id: Uuid) -> Result<Reservation, DomainError> {
        self.transition(id, ReservationStatus::Completed).await
    }

    #[instrument(
        name = "car_booking.service.update_notes",
        skip(self, notes),
        fields(reservation_id = %id)
    )]
    pub async fn update_notes(
        &self,
        id: Uuid,
        notes: Option<String>,
    ) -> Result<Reservation, DomainError> {
        debug!("Updating reservation notes");
        self.reservations
            .update_notes(id, normalize_notes(notes), Utc::now())
            .await
            .map_err(|e| store_failure("notes update", e))?
            .ok_or_else(|| DomainError::reservation_not_found(id))
    }

    #[instrument(
        name = "car_booking.service.update_notes_for_user",
        skip(self, notes),
        fields(reservation_id = %id, user_id = %user_id)
    )]
    pub async fn update_notes_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<Reservation, DomainError> {
        debug!("Updating reservation notes on behalf of user");
        let current = self.load(id).await?;
        if current.user_id != user_id {
            debug!("Reservation belongs to another user");
            return Err(DomainError::reservation_not_found(id));
        }
        self.update_notes(id, notes).await
    }

    #[instrument(
        name = "car_booking.service.get_reservation",
        skip(self),
        fields(reservation_id = %id)
    )]
    pub async fn get_reservation(&self, id: Uuid) -> Result<Reservation, DomainError> {
        debug!("Getting reservation by id");
        self.load(id).await
    }

    #[instrument(
        name = "car_booking.service.list_user_reservations",
        skip(self),
        fields(user_id = %user_id)
    )]
    pub async fn list_user_reservations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Reservation>, DomainError> {
        let items = self
            .reservations
            .list_by_user(user_id)
            .await
            .map_err(|e| store_failure("reservation listing", e))?;
        debug!("Listed {} reservations", items.len());
        Ok(items)
    }

    #[instrument(name = "car_booking.service.count_reservations", skip(self))]
    pub async fn count_reservations(&self) -> Result<u64, DomainError> {
        self.reservations
            .count()
            .await
            .map_err(|e| store_failure("reservation count", e))
    }

    #[instrument(
        name = "car_booking.service.register_car",
        skip(self),
        fields(name = %new_car.name, daily_rate = %new_car.daily_rate)
    )]
    pub async fn register_car(&self, new_car: NewCar) -> Result<Car, DomainError> {
        info!("Registering car");
        let car = Car {
            id: Uuid::new_v4(),
            name: new_car.name,
            daily_rate: new_car.daily_rate,
        };
        self.cars
            .insert(car.clone())
            .await
            .map_err(|e| persistence_failure("car insert", e))?;
        info!("Registered car with id={}", car.id);
        Ok(car)
    }

    // --- helpers ---

    async fn load(&self, id: Uuid) -> Result<Reservation, DomainError> {
        self.reservations
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("reservation lookup", e))?
            .ok_or_else(|| DomainError::reservation_not_found(id))
    }

    async fn apply_transition(
        &self,
        current: Reservation,
        next: ReservationStatus,
    ) -> Result<Reservation, DomainError> {
        if !current.status.can_transition_to(next) {
            debug!(from = %current.status, "Rejected status change");
            return Err(DomainError::invalid_transition(
                current.id,
                current.status,
                next,
            ));
        }

        let updated = self
            .reservations
            .update_status(current.id, current.status, next, Utc::now())
            .await
            .map_err(|e| store_failure("status update", e))?;

        let Some(updated) = updated else {
            // Another writer changed the status after we read it.
            let latest = self.load(current.id).await?;
            warn!(observed = %current.status, now = %latest.status, "Concurrent status change");
            return Err(DomainError::invalid_transition(
                current.id,
                latest.status,
                next,
            ));
        };

        self.events.publish(&ReservationDomainEvent::StatusChanged {
            id: updated.id,
            from: current.status,
            to: updated.status,
            at: updated.updated_at,
        });
        info!("Reservation moved from {} to {}", current.status, updated.status);
        Ok(updated)
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

fn persistence_failure(context: &str, err: impl Display) -> DomainError {
    warn!(error = %err, "{} failed", context);
    DomainError::persistence(format!("{context}: {err}"))
}

/// A storage-level exclusion violation means another writer won the race for
/// the same dates; it surfaces as `Unavailable`, never as a raw storage error.
fn store_failure(context: &str, err: StoreError) -> DomainError {
    match err {
        StoreError::Conflict { car_id } => {
            warn!(%car_id, "{} rejected by storage exclusion", context);
            DomainError::unavailable(car_id)
        }
        StoreError::Other(e) => persistence_failure(context, e),
    }
}
