//! Interval scheduler for crawl runs
//!
//! This module handles:
//! - Triggering a crawl run once per configured interval
//! - Logging run failures without stopping the process
//! - Skipping missed ticks when a run outlasts the interval

use crate::crawler::coordinator::{Coordinator, RunReport};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Scheduler triggers crawl runs on a fixed interval
///
/// Runs never overlap: the next tick is only awaited once the current run has
/// finished. A failed run is logged and the next tick starts over from scratch.
pub struct Scheduler {
    coordinator: Coordinator,
    interval: Duration,
}

impl Scheduler {
    pub fn new(coordinator: Coordinator, interval: Duration) -> Self {
        Self {
            coordinator,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one crawl, logging its failure instead of returning it
    pub async fn run_once(&self) -> Option<RunReport> {
        match self.coordinator.run().await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Failed: {}", e);
                None
            }
        }
    }

    /// Runs crawls forever, the first one a full interval after start
    pub async fn run_forever(&self) {
        tracing::info!(
            "Scraper service started. Rerun interval: {:.2} min.",
            self.interval.as_secs_f64() / 60.0
        );

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}
