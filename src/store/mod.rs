//! Collaborator interfaces consumed by the engine, plus in-process
//! implementations.
//!
//! # Data Flow
//! ```text
//! config file ([[services]], [[databases]])
//!     → memory.rs (Catalog snapshot, swapped atomically on reload)
//!     → DefinitionSource / ConnectionConfigSource
//!
//! Dispatcher
//!     → ResultSink::save
//!     → results.rs (bounded in-memory log + optional JSON-lines file)
//! ```
//!
//! # Design Decisions
//! - The engine only sees the traits; storage engines live behind them
//! - Readers take one snapshot per call, writers never block readers
//! - Results are append-only from the engine's point of view

pub mod memory;
pub mod results;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ConnectionConfig, ConnectionConfigId, HealthCheckResult, ServiceDefinition};

pub use memory::{Catalog, MemoryStore};
pub use results::ResultLog;

/// Errors raised by collaborator stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Supplies the service definitions for a cycle.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ServiceDefinition>, StoreError>;
}

/// Resolves DATABASE connection settings.
#[async_trait]
pub trait ConnectionConfigSource: Send + Sync {
    async fn find_by_id(&self, id: ConnectionConfigId) -> Result<Option<ConnectionConfig>, StoreError>;

    /// Every known config, ordered by id.
    async fn list_configs(&self) -> Result<Vec<ConnectionConfig>, StoreError>;
}

/// Persists health records.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn save(&self, result: HealthCheckResult) -> Result<(), StoreError>;
}
