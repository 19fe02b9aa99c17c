//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → registry.rs (check kind → adapter, built once at startup)
//!     → http.rs     (one request, status split, timeout)
//!     → database.rs (config lookup, cached pool, SELECT 1, timeout)
//!     → ProbeOutcome (UP / DOWN, elapsed ms, message)
//! ```
//!
//! # Design Decisions
//! - Adapters never return errors: every failure path becomes a DOWN outcome
//! - Each probe enforces its own deadline; a timeout drops the in-flight I/O
//! - Unknown check kinds have no adapter and are skipped by the dispatcher
//! - Adapters are shared (`Arc`) across concurrent units and cycles

pub mod database;
pub mod http;
pub mod registry;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{CheckKind, ProbeOutcome, ServiceDefinition};

pub use database::DatabaseProbe;
pub use http::HttpProbe;
pub use registry::AdapterRegistry;

/// Performs exactly one health probe for one service.
#[async_trait]
pub trait ProbeAdapter: Send + Sync {
    /// The check kind this adapter serves.
    fn kind(&self) -> CheckKind;

    /// Probe `service`. Must resolve within the adapter's own timeout.
    async fn probe(&self, service: &ServiceDefinition) -> ProbeOutcome;
}

/// Errors building an adapter at startup.
#[derive(Debug, Error)]
pub enum ProbeSetupError {
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
