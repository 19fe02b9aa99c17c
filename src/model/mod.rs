//! Domain types shared by the engine, the stores and the API.
//!
//! # Data Flow
//! ```text
//! ServiceDefinition (+ ConnectionConfig for DATABASE)
//!     → probe adapter
//!     → ProbeOutcome
//!     → HealthCheckResult (timestamped, tagged with the cycle id)
//!     → result sink
//! ```

pub mod outcome;
pub mod service;

pub use outcome::{HealthCheckResult, ProbeOutcome, ServiceStatus};
pub use service::{CheckKind, ConnectionConfig, ConnectionConfigId, ServiceDefinition, ServiceId};
