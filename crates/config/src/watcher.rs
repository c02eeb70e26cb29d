//! Polling watcher for hot-reloading the config file
//!
//! Long playback sessions pick up narrator changes made from another
//! process (for example `tilawah config set-narrator`) without restarting.

use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult};
use std::path::PathBuf;
use std::sync::{mpsc, Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};

type ReloadHook = Box<dyn Fn(&mut Config) + Send>;

/// Watches one config file and publishes reloaded values
pub struct ConfigWatcher {
    config_path: PathBuf,
    persistence: ConfigPersistence,
    current_config: Arc<RwLock<Config>>,
    last_modified: SystemTime,
    check_interval: Duration,
    on_reload: Option<ReloadHook>,
}

impl ConfigWatcher {
    pub fn new(config_path: PathBuf, initial_config: Config) -> ConfigResult<Self> {
        let last_modified = std::fs::metadata(&config_path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        Ok(Self {
            persistence: ConfigPersistence::new(config_path.clone()),
            config_path,
            current_config: Arc::new(RwLock::new(initial_config)),
            last_modified,
            check_interval: Duration::from_secs(2),
            on_reload: None,
        })
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Runs `hook` on every reloaded config before it is published
    ///
    /// Used to re-apply environment and command-line overrides that the
    /// file itself does not carry.
    pub fn with_reload_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Config) + Send + 'static,
    {
        self.on_reload = Some(Box::new(hook));
        self
    }

    /// Returns the shared config that reloads are written into
    pub fn config_handle(&self) -> Arc<RwLock<Config>> {
        Arc::clone(&self.current_config)
    }

    /// Reloads the config if the file changed since the last check
    ///
    /// A missing file is not a change. A failed reload keeps the old
    /// value and is retried on the next check.
    pub fn check_and_reload(&mut self) -> ConfigResult<bool> {
        let modified = match std::fs::metadata(&self.config_path) {
            Ok(metadata) => metadata.modified()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(ConfigError::IoError(e)),
        };

        if modified <= self.last_modified {
            return Ok(false);
        }

        log::info!("Config file modified, reloading...");
        let mut new_config = self.persistence.load()?;
        if let Some(hook) = &self.on_reload {
            hook(&mut new_config);
        }

        let mut config = self.current_config.write().map_err(|_| {
            ConfigError::ValidationError("Failed to acquire config write lock".to_string())
        })?;
        *config = new_config;
        self.last_modified = modified;

        log::info!("Config reloaded successfully");
        Ok(true)
    }

    /// Polls for changes on a background thread until the handle is dropped
    pub fn start_watching(mut self) -> WatchHandle {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            log::info!("Config watcher started for {}", self.config_path.display());

            loop {
                match rx.recv_timeout(self.check_interval) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                        log::info!("Config watcher stopped");
                        break;
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                }

                if let Err(e) = self.check_and_reload() {
                    log::error!("Error checking config: {}", e);
                }
            }
        });

        WatchHandle {
            stop_tx: tx,
            thread_handle: Some(handle),
        }
    }
}

/// Handle for a running config watcher
///
/// Dropping this handle stops the watcher thread.
pub struct WatchHandle {
    stop_tx: mpsc::Sender<()>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl WatchHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
