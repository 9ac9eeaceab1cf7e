//! Ingestion configuration from TOML (`[ingestion]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use votegate_application::IngestionParams;

/// Raw ingestion loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIngestionConfig {
    pub poll_interval_seconds: u64,
    /// Upper bound for the delay after repeated failures
    pub max_backoff_seconds: u64,
    /// Random extra delay after a failure, in milliseconds
    pub jitter_ms: u64,
}

impl Default for FileIngestionConfig {
    fn default() -> Self {
        let params = IngestionParams::default();
        Self {
            poll_interval_seconds: params.poll_interval.as_secs(),
            max_backoff_seconds: params.max_backoff.as_secs(),
            jitter_ms: params.jitter.as_millis() as u64,
        }
    }
}

impl FileIngestionConfig {
    pub fn to_params(&self) -> IngestionParams {
        IngestionParams::new(Duration::from_secs(self.poll_interval_seconds))
            .with_max_backoff(Duration::from_secs(self.max_backoff_seconds))
            .with_jitter(Duration::from_millis(self.jitter_ms))
    }
}
