//! Delays between operations

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for delays between operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DelayConfig {
    /// Fixed delay between operations
    Fixed {
        /// Delay in milliseconds
        delay_ms: u64,
    },
    /// Uniform delay in `[min_ms, max_ms]`
    Random { min_ms: u64, max_ms: u64 },
}

impl Default for DelayConfig {
    fn default() -> Self {
        DelayConfig::Fixed { delay_ms: 1000 }
    }
}

impl DelayConfig {
    pub fn fixed(delay_ms: u64) -> Self {
        DelayConfig::Fixed { delay_ms }
    }

    pub fn random(min_ms: u64, max_ms: u64) -> Self {
        DelayConfig::Random { min_ms, max_ms }
    }

    /// Get the actual delay to use (handles randomization)
    pub fn sample_ms<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match self {
            DelayConfig::Fixed { delay_ms } => *delay_ms,
            DelayConfig::Random { min_ms, max_ms } if max_ms > min_ms => {
                rng.gen_range(*min_ms..=*max_ms)
            }
            DelayConfig::Random { min_ms, .. } => *min_ms,
        }
    }

    /// Sleep for one sampled delay
    pub async fn wait<R: Rng + ?Sized>(&self, rng: &mut R) {
        sleep_ms(self.sample_ms(rng)).await;
    }
}

pub async fn sleep_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
