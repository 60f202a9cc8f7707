#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use car_booking::contract::model::{Car, Reservation, ReservationStatus};
use car_booking::contract::money::Money;
use car_booking::domain::events::ReservationDomainEvent;
use car_booking::domain::ports::EventPublisher;
use car_booking::domain::repo::{CarCatalog, ReservationStore, StoreError};
use car_booking::domain::service::{BookingAdmission, ServiceConfig};
use car_booking::infra::storage::migrations::Migrator;

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn june(d: u32) -> DateTime<Utc> {
    at(2024, 6, d)
}

pub fn money(s: &str) -> Money {
    s.parse().unwrap()
}

// Mock catalog for testing
#[derive(Default)]
pub struct MockCarCatalog {
    cars: Mutex<HashMap<Uuid, Car>>,
    pub fail: bool,
}

impl MockCarCatalog {
    pub fn with_car(daily_rate: &str) -> (Self, Car) {
        let car = Car {
            id: Uuid::new_v4(),
            name: "Test Car".to_string(),
            daily_rate: money(daily_rate),
        };
        let catalog = Self::default();
        catalog.cars.lock().unwrap().insert(car.id, car.clone());
        (catalog, car)
    }

    pub fn add(&self, daily_rate: &str) -> Car {
        let car = Car {
            id: Uuid::new_v4(),
            name: "Another Car".to_string(),
            daily_rate: money(daily_rate),
        };
        self.cars.lock().unwrap().insert(car.id, car.clone());
        car
    }
}

#[async_trait::async_trait]
impl CarCatalog for MockCarCatalog {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>> {
        if self.fail {
            anyhow::bail!("catalog offline");
        }
        Ok(self.cars.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, car: Car) -> Result<()> {
        self.cars.lock().unwrap().insert(car.id, car);
        Ok(())
    }
}

/// In-memory store without any write-time exclusion: admission correctness
/// against it relies entirely on the service.
#[derive(Default)]
pub struct MockReservationStore {
    rows: Mutex<Vec<Reservation>>,
    /// Simulated latency of the active-reservation read.
    pub read_delay: Option<Duration>,
    /// Error returned by `create`.
    pub fail_create: Option<fn(Uuid) -> StoreError>,
    pub find_active_calls: Mutex<usize>,
}

impl MockReservationStore {
    pub fn with_read_delay(delay: Duration) -> Self {
        Self {
            read_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn failing_create(make_err: fn(Uuid) -> StoreError) -> Self {
        Self {
            fail_create: Some(make_err),
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<Reservation> {
        self.rows.lock().unwrap().clone()
    }

    pub fn seed(&self, r: Reservation) {
        self.rows.lock().unwrap().push(r);
    }

    pub fn find_active_calls(&self) -> usize {
        *self.find_active_calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ReservationStore for MockReservationStore {
    async fn find_active_by_car_id(&self, car_id: Uuid) -> Result<Vec<Reservation>, StoreError> {
        *self.find_active_calls.lock().unwrap() += 1;
        let snapshot: Vec<Reservation> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.car_id == car_id && r.status.is_active())
            .cloned()
            .collect();
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn create(&self, reservation: Reservation) -> Result<(), StoreError> {
        if let Some(make_err) = self.fail_create {
            return Err(make_err(reservation.car_id));
        }
        self.rows.lock().unwrap().push(reservation);
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        next: ReservationStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.id == id && r.status == expected) else {
            return Ok(None);
        };
        row.status = next;
        row.updated_at = at;
        Ok(Some(row.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn update_notes(
        &self,
        id: Uuid,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        row.notes = notes;
        row.updated_at = at;
        Ok(Some(row.clone()))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Reservation>, StoreError> {
        let mut items: Vec<Reservation> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

// Recording event publisher for testing
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ReservationDomainEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<ReservationDomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventPublisher<ReservationDomainEvent> for RecordingPublisher {
    fn publish(&self, event: &ReservationDomainEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub struct Harness {
    pub service: Arc<BookingAdmission>,
    pub catalog: Arc<MockCarCatalog>,
    pub store: Arc<MockReservationStore>,
    pub events: Arc<RecordingPublisher>,
    pub car: Car,
}

pub fn harness(daily_rate: &str) -> Harness {
    harness_with(daily_rate, MockReservationStore::default(), ServiceConfig::default())
}

pub fn harness_with(daily_rate: &str, store: MockReservationStore, config: ServiceConfig) -> Harness {
    let (catalog, car) = MockCarCatalog::with_car(daily_rate);
    let catalog = Arc::new(catalog);
    let store = Arc::new(store);
    let events = Arc::new(RecordingPublisher::default());
    let service = Arc::new(BookingAdmission::new(
        catalog.clone(),
        store.clone(),
        events.clone(),
        config,
    ));
    Harness {
        service,
        catalog,
        store,
        events,
        car,
    }
}

/// Fresh in-memory SQLite database with migrations applied.
/// A single pooled connection keeps every query on the same memory database.
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
