//! Configuration file watcher for catalog hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::store::Catalog;

/// Watches the configuration file and publishes the services and databases
/// it declares whenever it changes.
///
/// Only the catalog is hot-reloaded; scheduler, pool, probe and API settings
/// are read once at startup.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Catalog>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for catalog updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Catalog>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_config = event.paths.iter().any(|p| p.file_name() == path.file_name());
                    if touches_config && (event.kind.is_modify() || event.kind.is_create()) {
                        tracing::info!("Config file change detected, reloading catalog");
                        match load_config(&path) {
                            Ok(config) => {
                                let _ = tx.send(config.catalog());
                            }
                            Err(e) => {
                                tracing::error!("Failed to reload config: {}. Keeping current catalog.", e);
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        // Watch the directory so files replaced by rename are still seen.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
