use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub id: i64,
    pub name: String,
    pub check_kind: String, // "HTTP", "DATABASE" or a kind the monitor cannot probe
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub database_config_id: Option<i64>,
    pub is_active: bool,
}

/// A connection config as the monitor exposes it. Passwords are never sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseEntry {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub connection_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: String,
    pub status: String,
    pub services: usize,
    pub probed: usize,
    pub up: usize,
    pub down: usize,
    pub skipped: usize,
    pub save_failures: usize,
    pub failed_units: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleStarted {
    pub cycle_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: String,
    pub cycle_id: String,
    pub service_id: i64,
    pub status: String, // "UP" or "DOWN"
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    pub checked_at: String,
}

pub struct MonitorClient {
    client: Client,
    base_url: String,
}

impl MonitorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Liveness of the monitor itself.
    pub async fn status(&self) -> Result<SystemStatus, Box<dyn std::error::Error>> {
        let resp = self.client.get(self.url("/api/monitoring/status")).send().await?;
        decode(resp).await
    }

    pub async fn services(&self) -> Result<Vec<ServiceEntry>, Box<dyn std::error::Error>> {
        let resp = self.client.get(self.url("/api/monitoring/services")).send().await?;
        decode(resp).await
    }

    /// Run one cycle and wait for its report.
    pub async fn run_checks(&self) -> Result<CycleReport, Box<dyn std::error::Error>> {
        let resp = self.client.post(self.url("/api/monitoring/check")).send().await?;
        decode(resp).await
    }

    /// Start one cycle without waiting for it.
    pub async fn start_checks(&self) -> Result<CycleStarted, Box<dyn std::error::Error>> {
        let resp = self.client.post(self.url("/api/monitoring/run")).send().await?;
        decode(resp).await
    }

    /// Most recent health records, newest first.
    pub async fn results(
        &self,
        limit: Option<usize>,
        service_id: Option<i64>,
    ) -> Result<Vec<HealthRecord>, Box<dyn std::error::Error>> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(id) = service_id {
            query.push(("service_id", id.to_string()));
        }

        let resp = self
            .client
            .get(self.url("/api/monitoring/results"))
            .query(&query)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn databases(&self) -> Result<Vec<DatabaseEntry>, Box<dyn std::error::Error>> {
        let resp = self.client.get(self.url("/api/monitoring/databases")).send().await?;
        decode(resp).await
    }

    /// One connection config; errors on an unknown id.
    pub async fn database(&self, id: i64) -> Result<DatabaseEntry, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(self.url(&format!("/api/monitoring/databases/{}", id)))
            .send()
            .await?;
        decode(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, Box<dyn std::error::Error>> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(format!("Monitor returned error status {}: {}", status, text).into());
    }

    Ok(serde_json::from_str::<T>(&text)?)
}
