//! Health check execution engine.
//!
//! # Data Flow
//! ```text
//! scheduler.rs (fixed period, initial delay)      API "run now"
//!     │                                               │
//!     └──────────────► Dispatcher::trigger() ◄────────┘
//!                          │  (own task, returns CycleHandle)
//!                          ▼
//!                  DefinitionSource::list_all (once per cycle)
//!                          │
//!            ┌─────────────┼─────────────┐
//!            ▼             ▼             ▼
//!      registry lookup (no adapter → skip, logged)
//!            │
//!            ▼
//!      pool.rs (bounded queue + bounded concurrency)
//!            │
//!            ▼
//!      adapter.probe → ResultSink::save (failure logged, never fatal)
//!            │
//!            ▼
//!      fan-in: CycleReport once every unit resolved
//! ```
//!
//! # Design Decisions
//! - No probe or save error escapes a cycle
//! - Cycles may overlap unless the scheduler is configured to skip
//! - No retry inside a cycle; the next tick is the next attempt

pub mod dispatcher;
pub mod pool;
pub mod scheduler;

pub use dispatcher::{CycleError, CycleHandle, CycleReport, Dispatcher, CYCLE_COMPLETED};
pub use pool::WorkerPool;
pub use scheduler::Scheduler;
