//! Feeds arbitrary bytes through config loading and migration.
//! Run with: cargo fuzz run config_parser

#![no_main]
use libfuzzer_sys::fuzz_target;
use tilawah_config::{Config, ConfigManager};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = toml::from_str::<Config>(s);

        // Full load path: parse, migrate, validate, re-save
        if let Ok(dir) = tempfile::TempDir::new() {
            if let Ok(manager) = ConfigManager::with_directory(dir.path().to_path_buf()) {
                if std::fs::write(manager.config_path(), s).is_ok() {
                    let _ = manager.load();
                }
            }
        }
    }
});
