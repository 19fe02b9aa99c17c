//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use service_monitor::health::ProbeAdapter;
use service_monitor::model::{CheckKind, HealthCheckResult, ProbeOutcome, ServiceDefinition};
use service_monitor::store::{DefinitionSource, ResultSink, StoreError};

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            204 => "204 No Content",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that always answers with `status`.
pub async fn start_mock_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move || async move { (status, "ok".to_string()) }).await
}

/// Start a backend that accepts connections and never answers.
pub async fn start_hanging_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Adapter that sleeps for a random latency and reports a fixed status.
pub struct FakeAdapter {
    pub kind: CheckKind,
    pub up: bool,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub calls: AtomicUsize,
    pub running: AtomicUsize,
    pub peak: AtomicUsize,
}

impl FakeAdapter {
    pub fn new(kind: CheckKind, up: bool, min_latency_ms: u64, max_latency_ms: u64) -> Self {
        Self {
            kind,
            up,
            min_latency_ms,
            max_latency_ms,
            calls: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbeAdapter for FakeAdapter {
    fn kind(&self) -> CheckKind {
        self.kind
    }

    async fn probe(&self, service: &ServiceDefinition) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let latency = if self.max_latency_ms > self.min_latency_ms {
            rand::random::<u64>() % (self.max_latency_ms - self.min_latency_ms) + self.min_latency_ms
        } else {
            self.min_latency_ms
        };
        tokio::time::sleep(Duration::from_millis(latency)).await;

        self.running.fetch_sub(1, Ordering::SeqCst);
        if self.up {
            ProbeOutcome::up(service.id, latency)
        } else {
            ProbeOutcome::down(service.id, Some(latency), "HTTP Error: 503")
        }
    }
}

/// Sink that records every result and fails for the listed service ids.
#[derive(Default)]
pub struct RecordingSink {
    pub saved: Mutex<Vec<HealthCheckResult>>,
    pub fail_for: Vec<i64>,
    pub attempts: AtomicUsize,
}

impl RecordingSink {
    pub fn failing_for(ids: Vec<i64>) -> Self {
        Self {
            fail_for: ids,
            ..Default::default()
        }
    }

    pub fn saved(&self) -> Vec<HealthCheckResult> {
        self.saved.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn save(&self, result: HealthCheckResult) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_for.contains(&result.service_id.0) {
            return Err(StoreError::Unavailable("sink offline".into()));
        }
        self.saved.lock().unwrap().push(result);
        Ok(())
    }
}

/// Definition source that counts how often it was listed.
pub struct CountingSource {
    pub services: Vec<ServiceDefinition>,
    pub lists: AtomicUsize,
}

impl CountingSource {
    pub fn new(services: Vec<ServiceDefinition>) -> Self {
        Self {
            services,
            lists: AtomicUsize::new(0),
        }
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DefinitionSource for CountingSource {
    async fn list_all(&self) -> Result<Vec<ServiceDefinition>, StoreError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        Ok(self.services.clone())
    }
}

/// A service of a kind no adapter serves.
pub fn kafka_service(id: i64, name: &str) -> ServiceDefinition {
    ServiceDefinition {
        id: id.into(),
        name: name.to_string(),
        check_kind: CheckKind::Kafka,
        url: None,
        database_config_id: None,
        is_active: true,
    }
}
