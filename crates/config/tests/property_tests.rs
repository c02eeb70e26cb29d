//! Invariants that hold for every reachable configuration

use tempfile::TempDir;
use tilawah_config::{
    Config, ConfigManager, TranslationLanguage, NO_SECONDARY_NARRATOR, PRIMARY_NARRATORS,
    SECONDARY_NARRATORS,
};

#[test]
fn property_serialization_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let toml_string = toml::to_string(&config)?;
    let deserialized: Config = toml::from_str(&toml_string)?;
    assert_eq!(config, deserialized);
    Ok(())
}

#[test]
fn property_every_known_narrator_pair_is_valid() {
    for primary in PRIMARY_NARRATORS {
        for secondary in SECONDARY_NARRATORS {
            let mut config = Config::default();
            config.audio.primary_narrator = primary.to_string();
            config.audio.secondary_narrator = secondary.to_string();
            assert!(config.validate().is_ok(), "{} / {}", primary, secondary);
        }
    }
}

#[test]
fn property_sync_never_enables_disabled_secondary() {
    for language in [TranslationLanguage::English, TranslationLanguage::Urdu] {
        let mut config = Config::default();
        config.audio.secondary_narrator = NO_SECONDARY_NARRATOR.to_string();
        config.reading.translation_language = language;
        config.sync_secondary_with_language();
        assert_eq!(config.audio.secondary_narrator, NO_SECONDARY_NARRATOR);
    }
}

#[test]
fn property_sync_result_is_valid() {
    for language in [TranslationLanguage::English, TranslationLanguage::Urdu] {
        let mut config = Config::default();
        config.reading.translation_language = language;
        config.sync_secondary_with_language();
        assert!(config.validate().is_ok());
        assert_eq!(config.audio.secondary(), Some(language.narrator()));
    }
}

#[test]
fn property_load_save_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;

    manager.save(&Config::default())?;
    let loaded = manager.load()?;
    manager.save(&loaded)?;
    assert_eq!(loaded, manager.load()?);
    Ok(())
}

#[test]
fn property_merge_preserves_validity() {
    let mut base = Config::default();
    let mut other = Config::default();
    other.audio.secondary_narrator = "en.walk".to_string();
    other.reading.translation_language = TranslationLanguage::English;

    base.merge(other.clone());
    assert!(base.validate().is_ok());
    assert_eq!(base, other);
}
