//! Check kind → adapter mapping.

use std::collections::HashMap;
use std::sync::Arc;

use crate::health::ProbeAdapter;
use crate::model::CheckKind;

/// Fixed mapping built once at startup. Lookups are read-only.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<CheckKind, Arc<dyn ProbeAdapter>>,
}

impl AdapterRegistry {
    /// Build from the known adapter set. The first adapter registered for a
    /// kind wins.
    pub fn new(adapters: Vec<Arc<dyn ProbeAdapter>>) -> Self {
        let mut map: HashMap<CheckKind, Arc<dyn ProbeAdapter>> = HashMap::new();
        for adapter in adapters {
            let kind = adapter.kind();
            if map.contains_key(&kind) {
                tracing::warn!(kind = %kind, "Duplicate adapter for check kind ignored");
                continue;
            }
            map.insert(kind, adapter);
        }

        let registry = Self { adapters: map };
        tracing::info!(kinds = ?registry.kinds(), "Probe adapters registered");
        registry
    }

    pub fn lookup(&self, kind: CheckKind) -> Option<Arc<dyn ProbeAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    /// Registered kinds, in a stable order.
    pub fn kinds(&self) -> Vec<CheckKind> {
        let mut kinds: Vec<CheckKind> = self.adapters.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProbeOutcome, ServiceDefinition};
    use async_trait::async_trait;

    struct Fixed {
        kind: CheckKind,
        latency_ms: u64,
    }

    #[async_trait]
    impl ProbeAdapter for Fixed {
        fn kind(&self) -> CheckKind {
            self.kind
        }

        async fn probe(&self, service: &ServiceDefinition) -> ProbeOutcome {
            ProbeOutcome::up(service.id, self.latency_ms)
        }
    }

    #[tokio::test]
    async fn test_lookup_by_kind() {
        let registry = AdapterRegistry::new(vec![
            Arc::new(Fixed { kind: CheckKind::Http, latency_ms: 1 }),
            Arc::new(Fixed { kind: CheckKind::Database, latency_ms: 2 }),
        ]);

        assert_eq!(registry.kinds(), vec![CheckKind::Database, CheckKind::Http]);
        assert!(registry.lookup(CheckKind::Kafka).is_none());

        let adapter = registry.lookup(CheckKind::Database).unwrap();
        let outcome = adapter.probe(&ServiceDefinition::database(1, "db", 1)).await;
        assert_eq!(outcome.response_time_ms, Some(2));
    }

    #[tokio::test]
    async fn test_first_registration_wins() {
        let registry = AdapterRegistry::new(vec![
            Arc::new(Fixed { kind: CheckKind::Http, latency_ms: 1 }),
            Arc::new(Fixed { kind: CheckKind::Http, latency_ms: 99 }),
        ]);

        assert_eq!(registry.len(), 1);
        let outcome = registry
            .lookup(CheckKind::Http)
            .unwrap()
            .probe(&ServiceDefinition::http(1, "web", "http://x"))
            .await;
        assert_eq!(outcome.response_time_ms, Some(1));
    }
}
