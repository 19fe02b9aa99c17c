//! HTTP probe.
//!
//! # Responsibilities
//! - Issue one unauthenticated request to the service URL
//! - Treat 2xx as UP, every other final status as DOWN
//! - Normalize transport errors and timeouts to DOWN

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method};
use tokio::time;

use crate::config::HttpProbeConfig;
use crate::health::{ProbeAdapter, ProbeSetupError};
use crate::model::outcome::elapsed_ms;
use crate::model::{CheckKind, ProbeOutcome, ServiceDefinition};

pub struct HttpProbe {
    client: Client,
    method: Method,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(config: &HttpProbeConfig) -> Result<Self, ProbeSetupError> {
        let method = Method::from_bytes(config.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ProbeSetupError::InvalidMethod(config.method.clone()))?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            method,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }
}

#[async_trait]
impl ProbeAdapter for HttpProbe {
    fn kind(&self) -> CheckKind {
        CheckKind::Http
    }

    async fn probe(&self, service: &ServiceDefinition) -> ProbeOutcome {
        let Some(url) = service.url.as_deref() else {
            return ProbeOutcome::down(service.id, None, "HTTP config error: service has no URL");
        };

        let start = Instant::now();
        let response_future = self.client.request(self.method.clone(), url).send();

        match time::timeout(self.timeout, response_future).await {
            Ok(Ok(response)) => {
                let status = response.status();
                let elapsed = elapsed_ms(start);
                if status.is_success() {
                    ProbeOutcome::up(service.id, elapsed)
                } else {
                    tracing::debug!(service = %service.name, %url, %status, "HTTP probe failed: non-success status");
                    ProbeOutcome::down(service.id, Some(elapsed), format!("HTTP Error: {}", status))
                }
            }
            Ok(Err(e)) => {
                tracing::debug!(service = %service.name, %url, error = %e, "HTTP probe failed: connection error");
                ProbeOutcome::down(service.id, Some(elapsed_ms(start)), format!("Connection error: {}", e))
            }
            Err(_) => {
                tracing::debug!(service = %service.name, %url, "HTTP probe failed: timeout");
                ProbeOutcome::down(
                    service.id,
                    Some(elapsed_ms(start)),
                    format!("Timeout after {} ms", self.timeout.as_millis()),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceStatus;

    #[test]
    fn test_rejects_invalid_method() {
        let config = HttpProbeConfig {
            method: "GE T".to_string(),
            ..HttpProbeConfig::default()
        };
        assert!(matches!(HttpProbe::new(&config), Err(ProbeSetupError::InvalidMethod(_))));
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let config = HttpProbeConfig {
            method: "head".to_string(),
            ..HttpProbeConfig::default()
        };
        let probe = HttpProbe::new(&config).unwrap();
        assert_eq!(probe.method, Method::HEAD);
    }

    #[tokio::test]
    async fn test_missing_url_is_down_without_timing() {
        let probe = HttpProbe::new(&HttpProbeConfig::default()).unwrap();
        let mut service = ServiceDefinition::http(4, "no-url", "http://unused");
        service.url = None;

        let outcome = probe.probe(&service).await;
        assert_eq!(outcome.status, ServiceStatus::Down);
        assert!(outcome.response_time_ms.is_none());
        assert!(outcome.message.unwrap().contains("no URL"));
    }

    #[tokio::test]
    async fn test_unparsable_url_is_connection_error() {
        let probe = HttpProbe::new(&HttpProbeConfig::default()).unwrap();
        let service = ServiceDefinition::http(5, "bad", "not a url");

        let outcome = probe.probe(&service).await;
        assert_eq!(outcome.status, ServiceStatus::Down);
        assert!(outcome.response_time_ms.is_some());
        assert!(outcome.message.unwrap().starts_with("Connection error"));
    }
}
