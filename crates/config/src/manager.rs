//! Configuration manager - main API for config operations

use crate::persistence::ConfigPersistence;
use crate::watcher::ConfigWatcher;
use crate::{Config, ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `TILAWAH_AUDIO_PREFETCH_DEPTH`
const ENV_PREFIX: &str = "TILAWAH";

/// Loads, saves and locates the tilawah config file
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager using the platform config directory
    ///
    /// - Linux: `~/.config/tilawah/`
    /// - macOS: `~/Library/Application Support/tilawah/`
    /// - Windows: `%APPDATA%\tilawah\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::project_dirs()?.config_dir().to_path_buf();
        Self::with_directory(config_dir)
    }

    /// Creates a config manager with a custom config directory
    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        let config_path = config_dir.join("config.toml");
        let persistence = ConfigPersistence::new(config_path);

        Ok(Self {
            persistence,
            config_dir,
        })
    }

    fn project_dirs() -> ConfigResult<ProjectDirs> {
        ProjectDirs::from("", "", "tilawah").ok_or_else(|| ConfigError::PathResolutionError {
            reason: "Could not determine user config directory".to_string(),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Directory for reading progress and bookmarks
    ///
    /// Uses `app.data_dir` when set, otherwise the platform data directory.
    pub fn data_dir(&self, config: &Config) -> ConfigResult<PathBuf> {
        match &config.app.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Loads the configuration from file
    ///
    /// A missing file yields defaults; a corrupted one is an error.
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Validates and atomically saves the configuration
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, modifies and saves the configuration in one step
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use tilawah_config::ConfigManager;
    /// # let manager = ConfigManager::new().unwrap();
    /// manager.update(|config| {
    ///     config.audio.secondary_narrator = "none".to_string();
    /// }).expect("Failed to update config");
    /// ```
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes a default config file if none exists
    ///
    /// Returns Ok(true) if a new file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.save(&Config::default())?;
        log::info!("Generated default config at {}", self.config_path().display());
        Ok(true)
    }

    /// Overwrites the config file with defaults
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Returns every validation problem in the stored config
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Starts a watcher on this manager's config file
    pub fn watcher(&self, initial: Config) -> ConfigResult<ConfigWatcher> {
        ConfigWatcher::new(self.config_path(), initial)
    }

    /// Loads the config and applies `TILAWAH_<SECTION>_<FIELD>` overrides
    ///
    /// Unparsable override values are ignored with a warning.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        Self::apply_process_env(&mut config);

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }

        Ok(config)
    }

    /// Applies `TILAWAH_*` overrides from the process environment
    pub fn apply_process_env(config: &mut Config) {
        Self::apply_env_overrides(config, |key| std::env::var(key).ok());
    }

    fn apply_env_overrides<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |section: &str, field: &str| {
            let key = format!("{}_{}_{}", ENV_PREFIX, section, field);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("APP", "LOG_LEVEL") {
            match value.parse() {
                Ok(level) => config.app.log_level = level,
                Err(e) => log::warn!("Ignoring {}: {}", key, e),
            }
        }
        if let Some((_, value)) = var("APP", "DATA_DIR") {
            config.app.data_dir = Some(PathBuf::from(value));
        }
        if let Some((_, value)) = var("AUDIO", "PRIMARY_NARRATOR") {
            config.audio.primary_narrator = value;
        }
        if let Some((_, value)) = var("AUDIO", "SECONDARY_NARRATOR") {
            config.audio.secondary_narrator = value;
        }
        if let Some((_, value)) = var("AUDIO", "RESOURCE_TEMPLATE") {
            config.audio.resource_template = value;
        }
        if let Some((key, value)) = var("AUDIO", "PLAYBACK_RATE") {
            match value.parse() {
                Ok(rate) => config.audio.playback_rate = rate,
                Err(e) => log::warn!("Ignoring {}: {}", key, e),
            }
        }
        if let Some((key, value)) = var("AUDIO", "PREFETCH_DEPTH") {
            match value.parse() {
                Ok(depth) => config.audio.prefetch_depth = depth,
                Err(e) => log::warn!("Ignoring {}: {}", key, e),
            }
        }
        if let Some((key, value)) = var("AUDIO", "STALL_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => config.audio.stall_timeout_secs = secs,
                Err(e) => log::warn!("Ignoring {}: {}", key, e),
            }
        }
        if let Some((key, value)) = var("READING", "TRANSLATION_LANGUAGE") {
            match value.parse() {
                Ok(language) => config.reading.translation_language = language,
                Err(e) => log::warn!("Ignoring {}: {}", key, e),
            }
        }
    }
}
