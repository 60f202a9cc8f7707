use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the car_booking module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarBookingConfig {
    #[serde(default)]
    pub max_rental_days: Option<u32>,
    #[serde(default = "default_lock_timeout", with = "humantime_serde")]
    pub lock_timeout: Duration,
}

impl Default for CarBookingConfig {
    fn default() -> Self {
        Self {
            max_rental_days: None,
            lock_timeout: default_lock_timeout(),
        }
    }
}

fn default_lock_timeout() -> Duration {
    Duration::from_secs(5)
}

impl From<CarBookingConfig> for ServiceConfig {
    fn from(cfg: CarBookingConfig) -> Self {
        ServiceConfig {
            max_rental_days: cfg.max_rental_days,
            lock_timeout: cfg.lock_timeout,
            ..ServiceConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg: CarBookingConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.max_rental_days, None);
        assert_eq!(cfg.lock_timeout, Duration::from_secs(5));
    }

    #[test]
    fn humantime_lock_timeout_and_limit_are_read() {
        let cfg: CarBookingConfig = serde_json::from_value(serde_json::json!({
            "max_rental_days": 14,
            "lock_timeout": "250ms"
        }))
        .unwrap();
        let service: ServiceConfig = cfg.into();
        assert_eq!(service.max_rental_days, Some(14));
        assert_eq!(service.lock_timeout, Duration::from_millis(250));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res = serde_json::from_value::<CarBookingConfig>(serde_json::json!({
            "lock_timout": "1s"
        }));
        assert!(res.is_err());
    }
}
