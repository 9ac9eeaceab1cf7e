//! Ingestion loop parameters

use rand::Rng;
use std::time::Duration;

/// Cadence of the ingestion loop
///
/// After a failed tick the next tick is delayed by
/// `poll_interval * 2^(failures - 1)`, capped at `max_backoff`, plus a
/// random jitter of up to `jitter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionParams {
    pub poll_interval: Duration,
    pub max_backoff: Duration,
    pub jitter: Duration,
}

impl Default for IngestionParams {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            max_backoff: Duration::from_secs(300),
            jitter: Duration::from_secs(1),
        }
    }
}

impl IngestionParams {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..Default::default()
        }
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Deterministic part of the delay after `failures` consecutive failures
    pub fn backoff_base(&self, failures: u32) -> Duration {
        if failures == 0 {
            return self.poll_interval;
        }
        let factor = 2u32.saturating_pow(failures - 1);
        self.poll_interval
            .saturating_mul(factor)
            .min(self.max_backoff.max(self.poll_interval))
    }

    /// Delay before the next tick, jittered when the previous one failed
    pub fn next_delay(&self, failures: u32) -> Duration {
        let base = self.backoff_base(failures);
        if failures == 0 || self.jitter.is_zero() {
            return base;
        }
        let jitter_ms = self.jitter.as_millis() as u64;
        base + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}
