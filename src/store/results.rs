//! Health record log.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::model::{HealthCheckResult, ServiceId};
use crate::store::{ResultSink, StoreError};

/// A result sink that keeps the most recent records in memory and can
/// mirror every record to a JSON-lines file.
pub struct ResultLog {
    recent: Mutex<VecDeque<HealthCheckResult>>,
    retained: usize,
    file: Option<tokio::sync::Mutex<File>>,
}

impl ResultLog {
    /// Memory-only log keeping the last `retained` records.
    pub fn in_memory(retained: usize) -> Self {
        Self {
            recent: Mutex::new(VecDeque::with_capacity(retained.min(1024))),
            retained,
            file: None,
        }
    }

    /// Log that also appends each record to `path`.
    pub async fn with_file(path: &Path, retained: usize) -> Result<Self, StoreError> {
        let file = OpenOptions::new().create(true).append(true).open(path).await?;
        tracing::info!(path = ?path, retained, "Result log opened");

        let mut log = Self::in_memory(retained);
        log.file = Some(tokio::sync::Mutex::new(file));
        Ok(log)
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<HealthCheckResult>> {
        match self.recent.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<HealthCheckResult> {
        self.lock().iter().rev().take(limit).cloned().collect()
    }

    /// Most recent records for one service, newest first.
    pub fn recent_for(&self, service_id: ServiceId, limit: usize) -> Vec<HealthCheckResult> {
        self.lock()
            .iter()
            .rev()
            .filter(|r| r.service_id == service_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Newest record for one service, if still retained.
    pub fn latest_for(&self, service_id: ServiceId) -> Option<HealthCheckResult> {
        self.recent_for(service_id, 1).into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remember(&self, result: HealthCheckResult) {
        if self.retained == 0 {
            return;
        }
        let mut recent = self.lock();
        while recent.len() >= self.retained {
            recent.pop_front();
        }
        recent.push_back(result);
    }
}

async fn append_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await
}

#[async_trait]
impl ResultSink for ResultLog {
    async fn save(&self, result: HealthCheckResult) -> Result<(), StoreError> {
        if let Some(file) = &self.file {
            let mut line = serde_json::to_vec(&result)?;
            line.push(b'\n');

            let mut file = file.lock().await;
            let committed = file.metadata().await?.len();
            if let Err(e) = append_line(&mut file, &line).await {
                // Drop any partial line so the next record starts on a clean line.
                if let Err(trim) = file.set_len(committed).await {
                    tracing::error!(error = %trim, "Failed to trim partial result line");
                }
                return Err(e.into());
            }
        }

        self.remember(result);
        Ok(())
    }
}
