//! Database probe.
//!
//! # Responsibilities
//! - Resolve the service's connection config
//! - Reuse the parsed connect options per connection URL
//! - Open one connection, run `SELECT 1`, close it, all under a hard deadline
//!
//! # Design Decisions
//! - The options cache has no eviction; entries live as long as the process
//! - First writer wins per URL; cached options are never refreshed
//! - One connect attempt per probe: a refused connection is reported as is
//! - Config failures carry no response time (nothing was attempted)

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sqlx::any::AnyConnectOptions;
use sqlx::{ConnectOptions, Connection};
use thiserror::Error;
use tokio::time;
use url::Url;

use crate::config::DatabaseProbeConfig;
use crate::health::ProbeAdapter;
use crate::model::outcome::elapsed_ms;
use crate::model::{CheckKind, ConnectionConfig, ConnectionConfigId, ProbeOutcome, ServiceDefinition};
use crate::store::{ConnectionConfigSource, StoreError};

/// Why a service's connection config could not be resolved.
#[derive(Debug, Error)]
pub enum ConfigLookupError {
    #[error("service has no connection config")]
    Unreferenced,

    #[error("no connection config with id {0}")]
    NotFound(ConnectionConfigId),

    #[error(transparent)]
    Source(#[from] StoreError),
}

pub struct DatabaseProbe {
    configs: Arc<dyn ConnectionConfigSource>,
    /// Connection URL → parsed connect options.
    targets: DashMap<String, AnyConnectOptions>,
    timeout: Duration,
}

impl DatabaseProbe {
    pub fn new(configs: Arc<dyn ConnectionConfigSource>, config: &DatabaseProbeConfig) -> Self {
        sqlx::any::install_default_drivers();

        Self {
            configs,
            targets: DashMap::new(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Override the probe deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of distinct connection URLs seen so far.
    pub fn cached_targets(&self) -> usize {
        self.targets.len()
    }

    async fn resolve(&self, service: &ServiceDefinition) -> Result<ConnectionConfig, ConfigLookupError> {
        let id = service.database_config_id.ok_or(ConfigLookupError::Unreferenced)?;
        self.configs
            .find_by_id(id)
            .await?
            .ok_or(ConfigLookupError::NotFound(id))
    }

    fn options_for(&self, config: &ConnectionConfig) -> Result<AnyConnectOptions, sqlx::Error> {
        if let Some(options) = self.targets.get(&config.connection_url) {
            return Ok(options.value().clone());
        }

        match self.targets.entry(config.connection_url.clone()) {
            Entry::Occupied(existing) => Ok(existing.get().clone()),
            Entry::Vacant(slot) => {
                let options = AnyConnectOptions::from_str(&effective_url(config))?;
                tracing::debug!(config_id = %config.id, driver = ?config.driver, "Connect options cached");
                Ok(slot.insert(options).value().clone())
            }
        }
    }

    async fn ping(&self, config: &ConnectionConfig) -> Result<(), sqlx::Error> {
        let options = self.options_for(config)?;
        let mut conn = options.connect().await?;
        let result = sqlx::query("SELECT 1").fetch_one(&mut conn).await;
        let _ = conn.close().await;
        result.map(|_| ())
    }
}

#[async_trait]
impl ProbeAdapter for DatabaseProbe {
    fn kind(&self) -> CheckKind {
        CheckKind::Database
    }

    async fn probe(&self, service: &ServiceDefinition) -> ProbeOutcome {
        let config = match self.resolve(service).await {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(service = %service.name, error = %e, "Database probe failed: config lookup");
                return ProbeOutcome::down(service.id, None, format!("Database config error: {}", e));
            }
        };

        let start = Instant::now();
        match time::timeout(self.timeout, self.ping(&config)).await {
            Ok(Ok(())) => {
                ProbeOutcome::up(service.id, elapsed_ms(start)).with_message("Database connection successful")
            }
            Ok(Err(e)) => {
                tracing::debug!(service = %service.name, error = %e, "Database probe failed");
                ProbeOutcome::down(service.id, Some(elapsed_ms(start)), format!("Database error: {}", e))
            }
            Err(_) => {
                tracing::debug!(service = %service.name, "Database probe failed: timeout");
                ProbeOutcome::down(
                    service.id,
                    Some(elapsed_ms(start)),
                    format!("Database error: timed out after {} ms", self.timeout.as_millis()),
                )
            }
        }
    }
}

/// The URL handed to the driver: the driver hint fills in a missing scheme and
/// configured credentials fill in a URL that carries none.
pub fn effective_url(config: &ConnectionConfig) -> String {
    let raw = match config.driver.as_deref() {
        Some(driver)
            if !config.connection_url.contains("://")
                && !config.connection_url.starts_with(&format!("{}:", driver)) =>
        {
            format!("{}://{}", driver, config.connection_url)
        }
        _ => config.connection_url.clone(),
    };

    let Some(username) = config.username.as_deref() else {
        return raw;
    };

    match Url::parse(&raw) {
        Ok(mut url) if url.has_host() && url.username().is_empty() => {
            if url.set_username(username).is_err() {
                return raw;
            }
            if url.set_password(config.password.as_deref()).is_err() {
                return raw;
            }
            url.to_string()
        }
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceStatus;
    use crate::store::{Catalog, MemoryStore};

    fn probe_with(databases: Vec<ConnectionConfig>) -> DatabaseProbe {
        let store = Arc::new(MemoryStore::new(Catalog::new(Vec::new(), databases)));
        DatabaseProbe::new(store, &DatabaseProbeConfig::default()).with_timeout(Duration::from_secs(2))
    }

    struct BrokenSource;

    #[async_trait]
    impl ConnectionConfigSource for BrokenSource {
        async fn find_by_id(&self, _id: ConnectionConfigId) -> Result<Option<ConnectionConfig>, StoreError> {
            Err(StoreError::Unavailable("catalog offline".into()))
        }

        async fn list_configs(&self) -> Result<Vec<ConnectionConfig>, StoreError> {
            Err(StoreError::Unavailable("catalog offline".into()))
        }
    }

    #[test]
    fn test_effective_url_injects_credentials() {
        let config = ConnectionConfig::new(1, "postgres://db.internal:5432/app").with_credentials("app", "pw");
        assert_eq!(effective_url(&config), "postgres://app:pw@db.internal:5432/app");
    }

    #[test]
    fn test_effective_url_keeps_embedded_credentials() {
        let config = ConnectionConfig::new(1, "postgres://owner:x@db/app").with_credentials("app", "pw");
        assert_eq!(effective_url(&config), "postgres://owner:x@db/app");
    }

    #[test]
    fn test_effective_url_uses_driver_hint() {
        let mut config = ConnectionConfig::new(1, "db.internal:3306/app");
        config.driver = Some("mysql".into());
        assert_eq!(effective_url(&config), "mysql://db.internal:3306/app");

        let mut sqlite = ConnectionConfig::new(2, "sqlite::memory:");
        sqlite.driver = Some("sqlite".into());
        assert_eq!(effective_url(&sqlite), "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_missing_config_is_config_error_without_timing() {
        let probe = probe_with(Vec::new());
        let outcome = probe.probe(&ServiceDefinition::database(1, "orders-db", 999)).await;

        assert_eq!(outcome.status, ServiceStatus::Down);
        assert!(outcome.response_time_ms.is_none());
        assert!(outcome.message.unwrap().contains("Database config error"));
        assert_eq!(probe.cached_targets(), 0);
    }

    #[tokio::test]
    async fn test_unreferenced_config_is_config_error() {
        let probe = probe_with(Vec::new());
        let mut service = ServiceDefinition::database(1, "orders-db", 1);
        service.database_config_id = None;

        let outcome = probe.probe(&service).await;
        assert!(outcome.message.unwrap().starts_with("Database config error"));
        assert!(outcome.response_time_ms.is_none());
    }

    #[tokio::test]
    async fn test_source_failure_is_config_error() {
        let probe = DatabaseProbe::new(Arc::new(BrokenSource), &DatabaseProbeConfig::default());
        let outcome = probe.probe(&ServiceDefinition::database(1, "orders-db", 1)).await;

        assert_eq!(outcome.status, ServiceStatus::Down);
        assert!(outcome.message.unwrap().contains("catalog offline"));
    }

    #[tokio::test]
    async fn test_unknown_scheme_is_database_error() {
        let probe = probe_with(vec![ConnectionConfig::new(1, "r2dbc:invalid://localhost:9999/test")
            .with_credentials("user", "pass")]);
        let outcome = probe.probe(&ServiceDefinition::database(1, "orders-db", 1)).await;

        assert_eq!(outcome.status, ServiceStatus::Down);
        assert!(outcome.response_time_ms.is_some());
        assert!(outcome.message.unwrap().contains("Database error"));
    }

    #[tokio::test]
    async fn test_sqlite_memory_is_up_and_options_are_reused() {
        let probe = probe_with(vec![ConnectionConfig::new(1, "sqlite::memory:")]);
        let service = ServiceDefinition::database(1, "cache-db", 1);

        let first = probe.probe(&service).await;
        let second = probe.probe(&service).await;

        assert_eq!(first.status, ServiceStatus::Up, "{:?}", first.message);
        assert_eq!(second.status, ServiceStatus::Up);
        assert!(first.response_time_ms.is_some());
        assert_eq!(first.message.as_deref(), Some("Database connection successful"));
        assert_eq!(probe.cached_targets(), 1);
    }
}
