//! Per-car admission locks.
//!
//! A booking for a car holds that car's lock across the
//! read-active-reservations / overlap-check / insert sequence, so two callers
//! in this process can never both pass the overlap check for the same car.
//! Different cars never contend.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("timed out after {waited:?} waiting for admission lock of car {car_id}")]
pub struct LockTimeout {
    pub car_id: Uuid,
    pub waited: Duration,
}

/// Guard returned by [`CarLocks::acquire`]; the lock is released on drop.
pub type CarLockGuard = OwnedMutexGuard<()>;

#[derive(Debug)]
pub struct CarLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
    timeout: Duration,
}

impl CarLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            timeout,
        }
    }

    /// Wait at most the configured timeout for the car's lock.
    pub async fn acquire(&self, car_id: Uuid) -> Result<CarLockGuard, LockTimeout> {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = Arc::clone(&self.locks.entry(car_id).or_default());
        tokio::time::timeout(self.timeout, lock.lock_owned())
            .await
            .map_err(|_| LockTimeout {
                car_id,
                waited: self.timeout,
            })
    }

    /// Drop registry entries nobody is holding or waiting on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
