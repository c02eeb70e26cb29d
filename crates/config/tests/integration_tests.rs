//! Integration tests for the configuration system

use std::fs;
use tempfile::TempDir;
use tilawah_config::{
    Config, ConfigError, ConfigManager, TranslationLanguage, CONFIG_VERSION,
    NO_SECONDARY_NARRATOR,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    assert!(manager.initialize()?);
    let mut config = manager.load()?;
    assert_eq!(config, Config::default());

    config.audio.primary_narrator = "ar.mahermuaiqly".to_string();
    config.audio.prefetch_depth = 2;
    manager.save(&config)?;

    let reloaded = manager.load()?;
    assert_eq!(reloaded.audio.primary_narrator, "ar.mahermuaiqly");
    assert_eq!(reloaded.audio.prefetch_depth, 2);

    manager.reset()?;
    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_language_change_follows_narrator() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    manager.update(|config| {
        config.reading.translation_language = TranslationLanguage::English;
        config.sync_secondary_with_language();
    })?;

    let config = manager.load()?;
    assert_eq!(config.audio.secondary_narrator, "en.walk");
    Ok(())
}

#[test]
fn test_language_change_keeps_secondary_off() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    manager.update(|config| {
        config.audio.secondary_narrator = NO_SECONDARY_NARRATOR.to_string();
    })?;
    manager.update(|config| {
        config.reading.translation_language = TranslationLanguage::English;
        config.sync_secondary_with_language();
    })?;

    assert!(manager.load()?.audio.secondary().is_none());
    Ok(())
}

#[test]
fn test_legacy_file_upgraded_on_load() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(
        manager.config_path(),
        "[audio]\nsecondary_narrator = \"ur.jalandhry\"\n\n[reading]\ntranslation_language = \"urdu\"\n",
    )?;

    let config = manager.load()?;
    assert_eq!(config.version, CONFIG_VERSION);
    assert_eq!(config.audio.secondary_narrator, "ur.khan");
    assert!(manager.validate()?.is_empty());
    Ok(())
}

#[test]
fn test_partial_file_fills_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    fs::write(
        manager.config_path(),
        format!("version = {}\n[audio]\nplayback_rate = 1.25\n", CONFIG_VERSION),
    )?;

    let config = manager.load()?;
    assert_eq!(config.audio.playback_rate, 1.25);
    assert_eq!(config.audio.primary_narrator, "ar.alafasy");
    assert_eq!(config.reading, Config::default().reading);
    Ok(())
}

#[test]
fn test_no_temp_files_left_after_save() -> Result<(), Box<dyn std::error::Error>> {
    let (temp_dir, manager) = setup_test_manager()?;

    for depth in 0..5 {
        manager.update(|config| config.audio.prefetch_depth = depth)?;
    }

    let names: Vec<String> = fs::read_dir(temp_dir.path())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().all(|n| n == "config.toml" || n == "config.toml.backup"));
    assert_eq!(manager.load()?.audio.prefetch_depth, 4);
    Ok(())
}

#[test]
fn test_invalid_update_leaves_file_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;

    let result = manager.update(|config| {
        config.audio.primary_narrator = "ar.nobody".to_string();
    });
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_watcher_from_manager() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;

    let watcher = manager.watcher(manager.load()?)?;
    let handle = watcher.config_handle();
    assert_eq!(*handle.read().map_err(|e| e.to_string())?, Config::default());
    Ok(())
}
