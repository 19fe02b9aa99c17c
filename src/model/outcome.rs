//! Probe outcomes and their persisted form.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::service::ServiceId;

/// Liveness verdict of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Up,
    Down,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Up => "UP",
            ServiceStatus::Down => "DOWN",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized result returned by a probe adapter.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProbeOutcome {
    pub service_id: ServiceId,
    pub status: ServiceStatus,

    /// Absent when the probe could not even be attempted.
    pub response_time_ms: Option<u64>,

    pub message: Option<String>,
}

impl ProbeOutcome {
    pub fn up(service_id: ServiceId, response_time_ms: u64) -> Self {
        Self {
            service_id,
            status: ServiceStatus::Up,
            response_time_ms: Some(response_time_ms),
            message: None,
        }
    }

    pub fn down(service_id: ServiceId, response_time_ms: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            service_id,
            status: ServiceStatus::Down,
            response_time_ms,
            message: Some(message.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == ServiceStatus::Up
    }
}

/// Milliseconds elapsed since `start`.
pub fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// One persisted health record. Append-only.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthCheckResult {
    pub id: Uuid,
    pub cycle_id: Uuid,
    pub service_id: ServiceId,
    pub status: ServiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn from_outcome(outcome: ProbeOutcome, cycle_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            cycle_id,
            service_id: outcome.service_id,
            status: outcome.status,
            response_time_ms: outcome.response_time_ms,
            message: outcome.message,
            checked_at: Utc::now(),
        }
    }
}
