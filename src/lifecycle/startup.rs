//! Startup orchestration.
//!
//! # Responsibilities
//! - Build stores, adapters, registry and dispatcher from a validated config
//! - Start background tasks (scheduler, catalog reload, API server)
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The API listener binds last

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::api::{self, ApiState};
use crate::config::watcher::ConfigWatcher;
use crate::config::MonitorConfig;
use crate::engine::{Dispatcher, Scheduler, WorkerPool};
use crate::health::{AdapterRegistry, DatabaseProbe, HttpProbe, ProbeAdapter, ProbeSetupError};
use crate::lifecycle::shutdown::Shutdown;
use crate::store::{MemoryStore, ResultLog, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("probe setup failed: {0}")]
    Probe(#[from] ProbeSetupError),

    #[error("result log unavailable: {0}")]
    Results(#[from] StoreError),

    #[error("API listener failed: {0}")]
    Listener(#[from] std::io::Error),

    #[error("config watcher failed: {0}")]
    Watcher(#[from] notify::Error),
}

/// A fully wired monitor.
pub struct Monitor {
    pub config: MonitorConfig,
    pub store: Arc<MemoryStore>,
    pub results: Arc<ResultLog>,
    pub dispatcher: Arc<Dispatcher>,
}

impl Monitor {
    pub async fn build(config: MonitorConfig) -> Result<Self, StartupError> {
        let store = Arc::new(MemoryStore::new(config.catalog()));

        let retained = config.storage.retained_results;
        let results = Arc::new(match &config.storage.results_path {
            Some(path) => ResultLog::with_file(Path::new(path), retained).await?,
            None => ResultLog::in_memory(retained),
        });

        let adapters: Vec<Arc<dyn ProbeAdapter>> = vec![
            Arc::new(HttpProbe::new(&config.http_probe)?),
            Arc::new(DatabaseProbe::new(store.clone(), &config.database_probe)),
        ];

        let dispatcher = Arc::new(Dispatcher::new(
            store.clone(),
            AdapterRegistry::new(adapters),
            results.clone(),
            WorkerPool::new(&config.worker_pool),
        ));

        tracing::info!(
            services = store.service_count(),
            max_concurrency = config.worker_pool.max_concurrency,
            queue_capacity = config.worker_pool.queue_capacity,
            "Monitor initialized"
        );

        Ok(Self {
            config,
            store,
            results,
            dispatcher,
        })
    }

    pub fn api_state(&self) -> ApiState {
        ApiState {
            dispatcher: self.dispatcher.clone(),
            definitions: self.store.clone(),
            databases: self.store.clone(),
            results: self.results.clone(),
        }
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.dispatcher.clone(), &self.config.scheduler)
    }

    /// Reload the catalog whenever `path` changes. Keep the returned watcher
    /// alive for as long as reloads are wanted.
    pub fn watch_config(&self, path: &Path, shutdown: &Shutdown) -> Result<RecommendedWatcher, StartupError> {
        let (watcher, mut updates) = ConfigWatcher::new(path);
        let watcher = watcher.run()?;

        let store = self.store.clone();
        let mut stop = shutdown.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = updates.recv() => match update {
                        Some(catalog) => store.replace(catalog),
                        None => break,
                    },
                    _ = stop.recv() => break,
                }
            }
        });

        Ok(watcher)
    }

    /// Run the scheduler and, when enabled, the API until `shutdown` fires.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), StartupError> {
        let scheduler = self.scheduler();
        let scheduler_task = tokio::spawn(scheduler.run(shutdown.subscribe()));

        if self.config.api.enabled {
            let listener = TcpListener::bind(&self.config.api.bind_address).await?;
            let app = api::router(
                self.api_state(),
                Duration::from_secs(self.config.api.request_timeout_secs),
            );
            api::serve(listener, app, shutdown.subscribe()).await?;
        } else {
            let mut stop = shutdown.subscribe();
            let _ = stop.recv().await;
        }

        if let Err(e) = scheduler_task.await {
            tracing::error!(error = %e, "Scheduler task failed");
        }
        Ok(())
    }
}
