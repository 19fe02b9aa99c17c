//! Bounded worker pool for per-service units.
//!
//! # Responsibilities
//! - Cap the number of probes running at once
//! - Cap the number of admitted (running + queued) units
//! - Apply backpressure to the submitter instead of dropping work

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::WorkerPoolConfig;

/// Shared by every cycle of a dispatcher, so overlapping cycles share the
/// same bound on outbound connections.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    /// Running + queued units.
    admission: Arc<Semaphore>,
    /// Running units.
    workers: Arc<Semaphore>,
    max_concurrency: usize,
    queue_capacity: usize,
}

impl WorkerPool {
    pub fn new(config: &WorkerPoolConfig) -> Self {
        Self::with_limits(config.max_concurrency, config.queue_capacity)
    }

    pub fn with_limits(max_concurrency: usize, queue_capacity: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            admission: Arc::new(Semaphore::new(max_concurrency + queue_capacity)),
            workers: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            queue_capacity,
        }
    }

    /// Spawn `task` into `set` once the pool admits it.
    ///
    /// Waits while `max_concurrency + queue_capacity` units are outstanding.
    /// Slots are released when the task finishes, not when it is joined.
    pub async fn spawn_in<T, F>(&self, set: &mut JoinSet<T>, task: F)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        // The semaphores are never closed, so acquisition only fails if that
        // invariant is broken; the unit then runs unbounded rather than lost.
        let admitted = self.admission.clone().acquire_owned().await.ok();
        let workers = Arc::clone(&self.workers);

        set.spawn(async move {
            let _admitted = admitted;
            let _running = workers.acquire_owned().await.ok();
            task.await
        });
    }

    /// Units currently executing.
    pub fn running(&self) -> usize {
        self.max_concurrency - self.workers.available_permits()
    }

    /// Units admitted and not yet finished.
    pub fn outstanding(&self) -> usize {
        self.max_concurrency + self.queue_capacity - self.admission.available_permits()
    }
}
