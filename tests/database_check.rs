//! Database checks against unreachable and unresponsive servers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use service_monitor::config::DatabaseProbeConfig;
use service_monitor::health::{DatabaseProbe, ProbeAdapter};
use service_monitor::model::{ConnectionConfig, ServiceDefinition, ServiceStatus};
use service_monitor::store::{Catalog, MemoryStore};

mod common;

fn checker_for(url: String, timeout: Duration) -> DatabaseProbe {
    let config = ConnectionConfig::new(1, url).with_credentials("monitor", "secret");
    let store = Arc::new(MemoryStore::new(Catalog::new(Vec::new(), vec![config])));
    DatabaseProbe::new(store, &DatabaseProbeConfig::default()).with_timeout(timeout)
}

#[tokio::test]
async fn test_refused_connection_reports_cause_without_waiting() {
    let addr = common::closed_port().await;
    let checker = checker_for(format!("postgres://{}/orders", addr), Duration::from_secs(5));
    let service = ServiceDefinition::database(1, "orders-db", 1);

    let start = Instant::now();
    let outcome = checker.probe(&service).await;
    let elapsed = start.elapsed();

    assert_eq!(outcome.status, ServiceStatus::Down);
    let message = outcome.message.unwrap();
    assert!(message.starts_with("Database error: "), "got {message}");
    assert!(message.to_lowercase().contains("refused"), "got {message}");
    assert!(!message.contains("timed out"), "got {message}");
    assert!(elapsed < Duration::from_secs(2), "refused connect took {elapsed:?}");
    assert!(outcome.response_time_ms.unwrap() < 2000);
}

#[tokio::test]
async fn test_each_check_makes_one_attempt() {
    let addr = common::closed_port().await;
    let checker = checker_for(format!("postgres://{}/orders", addr), Duration::from_secs(5));
    let service = ServiceDefinition::database(1, "orders-db", 1);

    let first = checker.probe(&service).await;
    let second = checker.probe(&service).await;

    assert!(!first.is_up());
    assert!(!second.is_up());
    assert!(second.message.unwrap().to_lowercase().contains("refused"));
    assert_eq!(checker.cached_targets(), 1);
}

#[tokio::test]
async fn test_unresponsive_server_times_out_within_bound() {
    let addr = common::start_hanging_backend().await;
    let checker = checker_for(format!("postgres://{}/orders", addr), Duration::from_millis(300));
    let service = ServiceDefinition::database(1, "orders-db", 1);

    let start = Instant::now();
    let outcome = checker.probe(&service).await;
    let elapsed = start.elapsed();

    assert_eq!(outcome.status, ServiceStatus::Down);
    assert_eq!(
        outcome.message.as_deref(),
        Some("Database error: timed out after 300 ms")
    );
    assert!(outcome.response_time_ms.unwrap() >= 300);
    assert!(elapsed < Duration::from_secs(2), "check overran its deadline: {elapsed:?}");
}
