//! One health check cycle: list, fan out, probe, persist, fan in.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::Instrument;
use uuid::Uuid;

use crate::engine::pool::WorkerPool;
use crate::health::{AdapterRegistry, ProbeAdapter};
use crate::model::{HealthCheckResult, ServiceDefinition, ServiceStatus};
use crate::observability::metrics;
use crate::store::{DefinitionSource, ResultSink};

/// Terminal status of a cycle that ran to completion.
pub const CYCLE_COMPLETED: &str = "Health checks completed";

/// Summary of one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub status: String,
    /// Definitions listed by the source.
    pub services: usize,
    /// Units that ran a probe.
    pub probed: usize,
    pub up: usize,
    pub down: usize,
    /// Definitions with no adapter for their kind.
    pub skipped: usize,
    pub save_failures: usize,
    /// Units whose task died before reporting (adapter panic).
    pub failed_units: usize,
    pub duration_ms: u64,
}

impl CycleReport {
    fn new(cycle_id: Uuid) -> Self {
        Self {
            cycle_id,
            status: String::new(),
            services: 0,
            probed: 0,
            up: 0,
            down: 0,
            skipped: 0,
            save_failures: 0,
            failed_units: 0,
            duration_ms: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == CYCLE_COMPLETED
    }

    fn record(&mut self, unit: UnitResult) {
        self.probed += 1;
        match unit.status {
            ServiceStatus::Up => self.up += 1,
            ServiceStatus::Down => self.down += 1,
        }
        if !unit.saved {
            self.save_failures += 1;
        }
    }
}

/// The cycle task ended without producing a report.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("cycle task panicked: {0}")]
    Panicked(String),

    #[error("cycle task was cancelled")]
    Cancelled,
}

impl From<JoinError> for CycleError {
    fn from(e: JoinError) -> Self {
        if e.is_cancelled() {
            CycleError::Cancelled
        } else {
            CycleError::Panicked(e.to_string())
        }
    }
}

/// Completion signal of a triggered cycle.
///
/// Awaiting it yields the report; dropping it leaves the cycle running.
#[derive(Debug)]
pub struct CycleHandle {
    cycle_id: Uuid,
    inner: JoinHandle<CycleReport>,
}

impl CycleHandle {
    pub fn cycle_id(&self) -> Uuid {
        self.cycle_id
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Future for CycleHandle {
    type Output = Result<CycleReport, CycleError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx).map(|joined| joined.map_err(CycleError::from))
    }
}

struct UnitResult {
    status: ServiceStatus,
    saved: bool,
}

/// Runs cycles against a definition source, an adapter registry and a sink.
pub struct Dispatcher {
    definitions: Arc<dyn DefinitionSource>,
    registry: AdapterRegistry,
    sink: Arc<dyn ResultSink>,
    pool: WorkerPool,
}

impl Dispatcher {
    pub fn new(
        definitions: Arc<dyn DefinitionSource>,
        registry: AdapterRegistry,
        sink: Arc<dyn ResultSink>,
        pool: WorkerPool,
    ) -> Self {
        Self {
            definitions,
            registry,
            sink,
            pool,
        }
    }

    /// Start a cycle on its own task and return immediately.
    pub fn trigger(self: &Arc<Self>) -> CycleHandle {
        let cycle_id = Uuid::new_v4();
        let dispatcher = Arc::clone(self);
        let inner = tokio::spawn(async move { dispatcher.run_cycle(cycle_id).await });
        CycleHandle { cycle_id, inner }
    }

    /// Run a cycle on the current task.
    pub async fn run(&self) -> CycleReport {
        self.run_cycle(Uuid::new_v4()).await
    }

    async fn run_cycle(&self, cycle_id: Uuid) -> CycleReport {
        let span = tracing::info_span!("cycle", %cycle_id);
        self.execute(cycle_id).instrument(span).await
    }

    async fn execute(&self, cycle_id: Uuid) -> CycleReport {
        let start = Instant::now();
        let mut report = CycleReport::new(cycle_id);

        tracing::info!("Health check cycle starting");

        let services = match self.definitions.list_all().await {
            Ok(services) => services,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list service definitions");
                report.status = format!("Health checks aborted: {}", e);
                report.duration_ms = start.elapsed().as_millis() as u64;
                return report;
            }
        };
        report.services = services.len();

        let mut units = JoinSet::new();
        for service in services {
            let Some(adapter) = self.registry.lookup(service.check_kind) else {
                tracing::warn!(
                    service_id = %service.id,
                    service = %service.name,
                    kind = %service.check_kind,
                    "No adapter for check kind, skipping"
                );
                metrics::record_skip(service.check_kind);
                report.skipped += 1;
                continue;
            };

            let span = tracing::debug_span!("service", service_id = %service.id, service = %service.name);
            let unit = run_unit(adapter, Arc::clone(&self.sink), service, cycle_id).instrument(span);
            self.pool.spawn_in(&mut units, unit).await;
        }

        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(unit) => report.record(unit),
                Err(e) => {
                    tracing::error!(error = %e, "Probe unit did not complete");
                    report.failed_units += 1;
                }
            }
        }

        let duration = start.elapsed();
        report.duration_ms = duration.as_millis() as u64;
        report.status = CYCLE_COMPLETED.to_string();
        metrics::record_cycle(duration);

        tracing::info!(
            services = report.services,
            up = report.up,
            down = report.down,
            skipped = report.skipped,
            save_failures = report.save_failures,
            duration_ms = report.duration_ms,
            "Health check cycle finished"
        );

        report
    }
}

/// Probe one service and persist the outcome.
async fn run_unit(
    adapter: Arc<dyn ProbeAdapter>,
    sink: Arc<dyn ResultSink>,
    service: ServiceDefinition,
    cycle_id: Uuid,
) -> UnitResult {
    let outcome = adapter.probe(&service).await;
    metrics::record_probe(service.check_kind, &service.name, &outcome);

    if outcome.is_up() {
        tracing::debug!(response_time_ms = ?outcome.response_time_ms, "Service is UP");
    } else {
        tracing::warn!(
            service = %service.name,
            response_time_ms = ?outcome.response_time_ms,
            reason = outcome.message.as_deref().unwrap_or_default(),
            "Service is DOWN"
        );
    }

    let status = outcome.status;
    let saved = match sink.save(HealthCheckResult::from_outcome(outcome, cycle_id)).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(service = %service.name, error = %e, "Failed to save health check result");
            metrics::record_save_failure();
            false
        }
    };

    UnitResult { status, saved }
}
