use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Rental interval end ({end}) must be after start ({start})")]
pub struct IntervalError {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Half-open rental period `[start, end)`.
///
/// The end instant is exclusive, so a rental returning on day X and another
/// picking up on day X share the boundary without conflicting.
/// The only way to build one is [`RentalInterval::new`], which guarantees
/// `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RentalInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl RentalInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if start >= end {
            return Err(IntervalError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// `[s1, e1)` and `[s2, e2)` intersect iff `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, other: &RentalInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whole days charged for this interval: any started day counts, minimum one.
    pub fn billable_days(&self) -> i64 {
        let delta = self.duration();
        let secs = delta.num_seconds();
        let partial = secs % SECONDS_PER_DAY != 0 || delta.subsec_nanos() > 0;
        (secs / SECONDS_PER_DAY + i64::from(partial)).max(1)
    }
}
