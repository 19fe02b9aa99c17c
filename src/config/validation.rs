//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals, timeouts, concurrency > 0)
//! - Check that each service carries the target its kind needs
//! - Detect duplicate identities
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - A DATABASE service pointing at an unknown database id is NOT rejected:
//!   the probe reports it as a DOWN config error at runtime

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::MonitorConfig;
use crate::model::{CheckKind, ConnectionConfigId, ServiceId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("invalid HTTP probe method '{0}'")]
    Method(String),

    #[error("invalid {field} '{value}'")]
    Address { field: &'static str, value: String },

    #[error("duplicate service id {0}")]
    DuplicateService(ServiceId),

    #[error("duplicate database id {0}")]
    DuplicateDatabase(ConnectionConfigId),

    #[error("HTTP service {0} has no url")]
    MissingUrl(ServiceId),

    #[error("DATABASE service {0} has no database_config_id")]
    MissingDatabaseRef(ServiceId),
}

pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.scheduler.interval_secs == 0 {
        errors.push(ValidationError::Zero("scheduler.interval_secs"));
    }
    if config.worker_pool.max_concurrency == 0 {
        errors.push(ValidationError::Zero("worker_pool.max_concurrency"));
    }
    if config.http_probe.timeout_ms == 0 {
        errors.push(ValidationError::Zero("http_probe.timeout_ms"));
    }
    if config.database_probe.timeout_secs == 0 {
        errors.push(ValidationError::Zero("database_probe.timeout_secs"));
    }
    if config.api.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("api.request_timeout_secs"));
    }

    if reqwest::Method::from_bytes(config.http_probe.method.to_ascii_uppercase().as_bytes()).is_err() {
        errors.push(ValidationError::Method(config.http_probe.method.clone()));
    }

    if config.api.enabled && config.api.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field: "api.bind_address",
            value: config.api.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::Address {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let mut service_ids = HashSet::new();
    for service in &config.services {
        if !service_ids.insert(service.id) {
            errors.push(ValidationError::DuplicateService(service.id));
        }
        match service.check_kind {
            CheckKind::Http if service.url.is_none() => {
                errors.push(ValidationError::MissingUrl(service.id));
            }
            CheckKind::Database if service.database_config_id.is_none() => {
                errors.push(ValidationError::MissingDatabaseRef(service.id));
            }
            _ => {}
        }
    }

    let mut database_ids = HashSet::new();
    for database in &config.databases {
        if !database_ids.insert(database.id) {
            errors.push(ValidationError::DuplicateDatabase(database.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionConfig, ServiceDefinition};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MonitorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = MonitorConfig::default();
        config.scheduler.interval_secs = 0;
        config.http_probe.method = "NOT A METHOD".into();
        config.api.bind_address = "localhost".into();

        let mut no_url = ServiceDefinition::http(1, "web", "http://x");
        no_url.url = None;
        config.services = vec![no_url.clone(), no_url];

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::Zero("scheduler.interval_secs")));
        assert!(errors.contains(&ValidationError::Method("NOT A METHOD".into())));
        assert!(errors.contains(&ValidationError::DuplicateService(ServiceId(1))));
        assert!(errors.contains(&ValidationError::MissingUrl(ServiceId(1))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Address { field: "api.bind_address", .. })));
    }

    #[test]
    fn test_dangling_database_reference_is_allowed() {
        let mut config = MonitorConfig::default();
        config.services = vec![ServiceDefinition::database(1, "orders-db", 42)];
        config.databases = vec![ConnectionConfig::new(7, "sqlite::memory:")];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_database_ids() {
        let mut config = MonitorConfig::default();
        config.databases = vec![
            ConnectionConfig::new(7, "sqlite::memory:"),
            ConnectionConfig::new(7, "postgres://db/app"),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicateDatabase(ConnectionConfigId(7))]);
    }
}
