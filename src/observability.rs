//! Logging setup and fetch counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count. `RUST_LOG` takes precedence when set.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global fmt subscriber, writing to stderr
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Counters for cache hits and live network calls
#[derive(Debug, Default)]
pub struct FetchStats {
    cache_hits: AtomicU64,
    network_calls: AtomicU64,
}

impl FetchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "cache_hits", "Metric incremented");
    }

    pub fn network_call(&self) {
        self.network_calls.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "network_calls", "Metric incremented");
    }

    pub fn snapshot(&self) -> FetchStatsSnapshot {
        FetchStatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            network_calls: self.network_calls.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchStatsSnapshot {
    pub cache_hits: u64,
    pub network_calls: u64,
}
