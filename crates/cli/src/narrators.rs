//! Bridges the settings file to the engine

use recitation_engine::{EngineSettings, NarratorSelection, NarratorSource, NO_NARRATOR};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tilawah_config::Config;

/// Narrator selection read live from a (possibly hot-reloaded) config
pub struct ConfigNarrators {
    config: Arc<RwLock<Config>>,
}

impl ConfigNarrators {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self { config }
    }
}

impl NarratorSource for ConfigNarrators {
    fn current(&self) -> NarratorSelection {
        match self.config.read() {
            Ok(config) => selection_from(&config),
            Err(poisoned) => selection_from(&poisoned.into_inner()),
        }
    }
}

pub fn selection_from(config: &Config) -> NarratorSelection {
    NarratorSelection::new(
        config.audio.primary_narrator.clone(),
        config.audio.secondary().unwrap_or(NO_NARRATOR),
    )
    .with_rate(config.audio.playback_rate)
}

pub fn engine_settings(config: &Config) -> EngineSettings {
    let stall = config.audio.stall_timeout_secs;
    EngineSettings {
        prefetch_depth: config.audio.prefetch_depth,
        stall_timeout: (stall > 0).then(|| Duration::from_secs(stall)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilawah_config::NO_SECONDARY_NARRATOR;

    #[test]
    fn test_defaults_map_to_both_stages() {
        let selection = selection_from(&Config::default());
        assert_eq!(selection.primary, "ar.alafasy");
        assert_eq!(selection.secondary(), Some("ur.khan"));
        assert_eq!(selection.rate, 1.0);
    }

    #[test]
    fn test_disabled_secondary() {
        let mut config = Config::default();
        config.audio.secondary_narrator = NO_SECONDARY_NARRATOR.to_string();
        assert!(!selection_from(&config).has_secondary());
    }

    #[test]
    fn test_live_updates_visible() {
        let shared = Arc::new(RwLock::new(Config::default()));
        let narrators = ConfigNarrators::new(Arc::clone(&shared));

        shared.write().unwrap().audio.primary_narrator = "ar.hudhaify".to_string();
        assert_eq!(narrators.current().primary, "ar.hudhaify");
    }

    #[test]
    fn test_engine_settings() {
        let mut config = Config::default();
        assert_eq!(engine_settings(&config).stall_timeout, None);
        assert_eq!(engine_settings(&config).prefetch_depth, 3);

        config.audio.stall_timeout_secs = 20;
        assert_eq!(
            engine_settings(&config).stall_timeout,
            Some(Duration::from_secs(20))
        );
    }
}
