//! Periodic cycle trigger.
//!
//! # Responsibilities
//! - Fire the dispatcher on a fixed period after an initial delay
//! - Never wait on a cycle from the timer loop
//! - Apply the configured overlap policy
//! - Log cycle failures (dispatcher defects) at the top level

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::{OverlapPolicy, SchedulerConfig};
use crate::engine::dispatcher::Dispatcher;

pub struct Scheduler {
    dispatcher: Arc<Dispatcher>,
    enabled: bool,
    initial_delay: Duration,
    interval: Duration,
    overlap: OverlapPolicy,
    /// Set while a scheduled cycle runs under `OverlapPolicy::Skip`.
    in_flight: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(dispatcher: Arc<Dispatcher>, config: &SchedulerConfig) -> Self {
        Self {
            dispatcher,
            enabled: config.enabled,
            initial_delay: config.initial_delay(),
            interval: config.interval(),
            overlap: config.overlap,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enabled scheduler with explicit timing.
    pub fn with_timing(
        dispatcher: Arc<Dispatcher>,
        initial_delay: Duration,
        interval: Duration,
        overlap: OverlapPolicy,
    ) -> Self {
        Self {
            dispatcher,
            enabled: true,
            initial_delay,
            interval,
            overlap,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.enabled {
            tracing::info!("Scheduled health checks disabled");
            return;
        }

        tracing::info!(
            initial_delay_ms = self.initial_delay.as_millis() as u64,
            interval_ms = self.interval.as_millis() as u64,
            overlap = ?self.overlap,
            "Scheduler starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.initial_delay, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.fire();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Start one cycle without waiting for it. Returns `false` when the tick
    /// was skipped because the previous scheduled cycle is still running.
    pub fn fire(&self) -> bool {
        let guard = match self.overlap {
            OverlapPolicy::Allow => None,
            OverlapPolicy::Skip => {
                if self.in_flight.swap(true, Ordering::AcqRel) {
                    tracing::warn!("Previous cycle still running, skipping tick");
                    return false;
                }
                Some(Arc::clone(&self.in_flight))
            }
        };

        let handle = self.dispatcher.trigger();
        tokio::spawn(async move {
            let cycle_id = handle.cycle_id();
            match handle.await {
                Ok(report) => {
                    tracing::debug!(%cycle_id, status = %report.status, "Scheduled cycle finished");
                }
                Err(e) => {
                    tracing::error!(%cycle_id, error = %e, "Scheduled cycle failed");
                }
            }
            if let Some(in_flight) = guard {
                in_flight.store(false, Ordering::Release);
            }
        });

        true
    }
}
