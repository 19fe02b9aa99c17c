//! In-memory catalog of services and connection configs.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::model::{ConnectionConfig, ConnectionConfigId, ServiceDefinition};
use crate::store::{ConnectionConfigSource, DefinitionSource, StoreError};

/// Everything the engine reads about the monitored estate.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub services: Vec<ServiceDefinition>,
    pub databases: Vec<ConnectionConfig>,
}

impl Catalog {
    pub fn new(services: Vec<ServiceDefinition>, databases: Vec<ConnectionConfig>) -> Self {
        Self { services, databases }
    }
}

struct Snapshot {
    services: Vec<ServiceDefinition>,
    databases: HashMap<ConnectionConfigId, ConnectionConfig>,
}

impl From<Catalog> for Snapshot {
    fn from(catalog: Catalog) -> Self {
        Self {
            services: catalog.services,
            databases: catalog
                .databases
                .into_iter()
                .map(|config| (config.id, config))
                .collect(),
        }
    }
}

/// Catalog store swapped atomically on reload.
///
/// A cycle that already listed its services keeps working from that list.
pub struct MemoryStore {
    inner: ArcSwap<Snapshot>,
}

impl MemoryStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: ArcSwap::from_pointee(Snapshot::from(catalog)),
        }
    }

    /// Replace the whole catalog.
    pub fn replace(&self, catalog: Catalog) {
        let services = catalog.services.len();
        let databases = catalog.databases.len();
        self.inner.store(Arc::new(Snapshot::from(catalog)));
        tracing::info!(services, databases, "Catalog replaced");
    }

    pub fn service_count(&self) -> usize {
        self.inner.load().services.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

#[async_trait]
impl DefinitionSource for MemoryStore {
    async fn list_all(&self) -> Result<Vec<ServiceDefinition>, StoreError> {
        Ok(self.inner.load().services.clone())
    }
}

#[async_trait]
impl ConnectionConfigSource for MemoryStore {
    async fn find_by_id(&self, id: ConnectionConfigId) -> Result<Option<ConnectionConfig>, StoreError> {
        Ok(self.inner.load().databases.get(&id).cloned())
    }

    async fn list_configs(&self) -> Result<Vec<ConnectionConfig>, StoreError> {
        let mut configs: Vec<ConnectionConfig> = self.inner.load().databases.values().cloned().collect();
        configs.sort_by_key(|config| config.id);
        Ok(configs)
    }
}
