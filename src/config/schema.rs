//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{ConnectionConfig, ServiceDefinition};
use crate::store::Catalog;

/// Root configuration for the service monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Periodic trigger settings.
    pub scheduler: SchedulerConfig,

    /// Bounds on concurrent probe work.
    pub worker_pool: WorkerPoolConfig,

    /// HTTP probe settings.
    pub http_probe: HttpProbeConfig,

    /// Database probe settings.
    pub database_probe: DatabaseProbeConfig,

    /// Monitoring API settings.
    pub api: ApiConfig,

    /// Result storage settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Services to probe.
    pub services: Vec<ServiceDefinition>,

    /// Connection configs referenced by DATABASE services.
    pub databases: Vec<ConnectionConfig>,
}

impl MonitorConfig {
    /// The services and connection configs, as handed to the store.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.services.clone(), self.databases.clone())
    }
}

/// What a tick does when the previous scheduled cycle is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Start another cycle anyway.
    #[default]
    Allow,
    /// Skip the tick.
    Skip,
}

/// Scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Enable periodic cycles.
    pub enabled: bool,

    /// Delay before the first cycle, in seconds.
    pub initial_delay_secs: u64,

    /// Period between cycle starts, in seconds.
    pub interval_secs: u64,

    pub overlap: OverlapPolicy,
}

impl SchedulerConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_secs: 5,
            interval_secs: 30,
            overlap: OverlapPolicy::Allow,
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerPoolConfig {
    /// Maximum probes running at once.
    pub max_concurrency: usize,

    /// Units admitted beyond `max_concurrency` before submission waits.
    pub queue_capacity: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 100,
            queue_capacity: 1000,
        }
    }
}

/// HTTP probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpProbeConfig {
    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,

    /// Request method (e.g., "GET", "HEAD").
    pub method: String,

    pub user_agent: String,
}

impl Default for HttpProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            method: "GET".to_string(),
            user_agent: "service-monitor-health-check".to_string(),
        }
    }
}

/// Database probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseProbeConfig {
    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DatabaseProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
        }
    }
}

/// Monitoring API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub enabled: bool,

    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds. Covers on-demand cycles.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Result storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Optional JSON-lines file receiving every result.
    pub results_path: Option<String>,

    /// Results kept in memory for the API.
    pub retained_results: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            results_path: None,
            retained_results: 1000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
