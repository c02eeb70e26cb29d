//! File system persistence for configuration
//!
//! - Atomic writes through a temp file in the target directory
//! - The previous file is kept as `config.toml.backup`
//! - Older files are migrated and re-saved on load

use crate::error::join_errors;
use crate::migration;
use crate::{Config, ConfigError, ConfigResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Reads and writes one config file
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Loads configuration from file
    ///
    /// A missing file yields the defaults. An empty or unparsable file is
    /// an error. Validation problems are only logged so a hand-edited file
    /// is never silently discarded.
    pub fn load(&self) -> ConfigResult<Config> {
        if !self.config_path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let contents =
            fs::read_to_string(&self.config_path).map_err(|e| ConfigError::ReadError {
                path: self.config_path.clone(),
                source: e,
            })?;

        if contents.trim().is_empty() {
            return Err(ConfigError::ReadError {
                path: self.config_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Config file is empty or contains only whitespace",
                ),
            });
        }

        let mut value: toml::Value =
            toml::from_str(&contents).map_err(|e| self.parse_error(e))?;
        let migrated = migration::migrate_to_latest(&mut value)?;

        let config: Config = value.try_into().map_err(|e| self.parse_error(e))?;

        if let Err(errors) = config.validate() {
            log::warn!("Config validation warnings: {}", join_errors(&errors));
        }

        if migrated {
            log::info!("Saving migrated config");
            if let Err(e) = self.save(&config) {
                log::warn!("Migrated config kept in memory only: {}", e);
            }
        }

        Ok(config)
    }

    fn parse_error(&self, source: toml::de::Error) -> ConfigError {
        ConfigError::ParseError {
            path: self.config_path.clone(),
            source,
        }
    }

    /// Validates and saves configuration atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        if let Err(errors) = config.validate() {
            return Err(ConfigError::ValidationError(join_errors(&errors)));
        }

        if let Some(parent) = self.config_path.parent() {
            self.ensure_directory_exists(parent)?;
        }

        if self.config_path.exists() {
            self.backup_config()?;
        }

        let toml_string = toml::to_string_pretty(config)?;
        let temp_file = self.create_temp_file()?;
        self.write_atomic(temp_file, &toml_string)?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }

    fn ensure_directory_exists(&self, path: &Path) -> ConfigResult<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| ConfigError::DirectoryCreationError {
                path: path.to_path_buf(),
                source: e,
            })?;
            log::info!("Created config directory: {}", path.display());
        }
        Ok(())
    }

    fn backup_config(&self) -> ConfigResult<()> {
        let backup_path = self.config_path.with_extension("toml.backup");
        fs::copy(&self.config_path, &backup_path)
            .map_err(|e| ConfigError::BackupError { source: e })?;
        log::debug!("Backed up config to {}", backup_path.display());
        Ok(())
    }

    fn create_temp_file(&self) -> ConfigResult<NamedTempFile> {
        let dir = self
            .config_path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Config path has no parent directory".to_string(),
            })?;

        Ok(NamedTempFile::new_in(dir)?)
    }

    fn write_atomic(&self, mut temp_file: NamedTempFile, content: &str) -> ConfigResult<()> {
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;

        temp_file
            .persist(&self.config_path)
            .map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e.error,
            })?;

        Ok(())
    }
}
