//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::CatalogConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<CatalogConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of validated updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<CatalogConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&path) {
                        Ok(new_config) => {
                            tracing::info!(path = %path.display(), "Config file reloaded");
                            if tx.send(new_config).is_err() {
                                tracing::debug!("Config update dropped, server has stopped");
                            }
                        }
                        Err(e) => tracing::error!(
                            path = %path.display(),
                            error = %e,
                            "Config reload failed, keeping current settings"
                        ),
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(path = %path.display(), error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}
