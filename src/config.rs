//! Runtime configuration assembled from the command line.

use std::time::Duration;

use log::warn;
use rand::Rng;

/// Default index endpoint, matching a local single-node deployment.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";
/// Default name of the aggregate index.
pub const DEFAULT_INDEX: &str = "nyc_taxi_trip_data";
/// Default number of availability probes before provisioning gives up.
pub const DEFAULT_PING_ATTEMPTS: u32 = 30;
/// Default fixed delay between availability probes, in milliseconds.
pub const DEFAULT_PING_DELAY_MS: u64 = 5_000;

/// Where aggregate documents go.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Base URL of the index endpoint, e.g. `http://localhost:9200`.
    pub endpoint: String,
    /// Index name.
    pub index: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            index: DEFAULT_INDEX.to_string(),
        }
    }
}

/// Availability-probe policy: a bounded number of attempts with a fixed
/// delay between them, plus optional uniform jitter on top so many waiters
/// do not probe in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_PING_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_PING_DELAY_MS),
            jitter: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration, jitter: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            jitter,
        }
    }

    /// How long to sleep after a failed attempt: the fixed delay plus a
    /// uniformly random share of the jitter window.
    pub fn sleep_duration(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.delay;
        }
        self.delay + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }
}

/// Cap rayon's global worker pool at `threads`. Returns whether the cap
/// applied; the pool can only be sized before its first use, so a late
/// cap is logged and ignored rather than aborting the run.
pub fn configure_thread_pool(threads: usize) -> bool {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        Ok(()) => true,
        Err(err) => {
            warn!("thread pool cap of {threads} not applied: {err}");
            false
        }
    }
}
