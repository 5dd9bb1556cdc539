use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::store::AddressStore;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub addresses: usize,
}

static START_TIME: std::sync::LazyLock<SystemTime> = std::sync::LazyLock::new(SystemTime::now);

pub struct HealthChecker {
    store: AddressStore,
}

impl HealthChecker {
    pub fn new(store: AddressStore) -> Self {
        Self { store }
    }

    /// Start the uptime clock, called once when the app is assembled
    pub fn mark_started() {
        std::sync::LazyLock::force(&START_TIME);
    }

    pub fn check_health(&self) -> HealthStatus {
        let now = SystemTime::now();
        let uptime = now.duration_since(*START_TIME)
            .unwrap_or_default()
            .as_secs();

        let (status, addresses) = match self.store.len() {
            Ok(count) => ("healthy", count),
            Err(_) => ("unhealthy", 0),
        };

        HealthStatus {
            status: status.to_string(),
            timestamp: now.duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            addresses,
        }
    }
}
