//! Service monitor library: periodic health checks over HTTP and database targets.

pub mod api;
pub mod config;
pub mod engine;
pub mod health;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod store;

pub use config::schema::MonitorConfig;
pub use engine::{CycleReport, Dispatcher, Scheduler};
pub use lifecycle::{Monitor, Shutdown};
