//! Tilawah Configuration System
//!
//! Settings for recitation playback and reading, stored as TOML.
//! Each section implements the `ConfigSection` trait.
//!
//! # Architecture
//!
//! - **Trait-based**: each section validates and merges itself
//! - **Graceful degradation**: invalid configs fall back to defaults with warnings
//! - **Atomic writes**: config files are never left in a corrupted state
//! - **Versioned**: older files are migrated on load
//!
//! # Example
//!
//! ```rust,no_run
//! use tilawah_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//!
//! println!("Reciter: {}", config.audio.primary_narrator);
//! ```

mod error;
mod manager;
mod migration;
mod persistence;
mod validation;

pub mod watcher;

// Config sections
pub mod app_config;
mod audio_config;
mod reading_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use audio_config::{
    AudioConfig, NO_SECONDARY_NARRATOR, PRIMARY_NARRATORS, SECONDARY_NARRATORS,
};
pub use reading_config::{ReadingConfig, TranslationLanguage};

use serde::{Deserialize, Serialize};

/// Current config file format version for migrations
pub const CONFIG_VERSION: u32 = 2;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Application-level settings
    pub app: AppConfig,

    /// Recitation audio settings
    pub audio: AudioConfig,

    /// Reading preferences
    pub reading: ReadingConfig,
}

impl Config {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the entire configuration
    ///
    /// Returns all validation errors found across all sections.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.audio.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.reading.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merges this config with another, preferring values from `other`
    ///
    /// This is used for override chains: defaults < file < env vars < CLI args
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.audio.merge(other.audio);
        self.reading.merge(other.reading);
    }

    /// Keeps the translation narrator in the same language as the text
    ///
    /// A disabled secondary narrator stays disabled. Returns true if the
    /// narrator was changed.
    pub fn sync_secondary_with_language(&mut self) -> bool {
        if self.audio.secondary().is_none() {
            return false;
        }

        let wanted = self.reading.translation_language.narrator();
        if self.audio.secondary_narrator == wanted {
            return false;
        }

        log::info!(
            "Switching translation narrator from {} to {} to match {} text",
            self.audio.secondary_narrator,
            wanted,
            self.reading.translation_language
        );
        self.audio.secondary_narrator = wanted.to_string();
        true
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            audio: AudioConfig::default(),
            reading: ReadingConfig::default(),
        }
    }
}
