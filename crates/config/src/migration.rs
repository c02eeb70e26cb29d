//! Configuration migration system
//!
//! Upgrades older config files before they are deserialized. Each
//! version bump registers a `Migration` in `get_migration`.

use crate::{ConfigError, ConfigResult, CONFIG_VERSION};

/// Version assumed for files written before the field existed
pub const UNVERSIONED: u32 = 1;

/// Translation narrators that were retired in favour of `ur.khan`
const RETIRED_SECONDARY_NARRATORS: &[&str] = &["ur.jalandhry", "ur.shamshadalkhan"];

/// A single upgrade step on the raw TOML tree
pub trait Migration {
    /// Version this migration upgrades TO
    fn target_version(&self) -> u32;

    fn migrate(&self, value: &mut toml::Value) -> ConfigResult<()>;
}

/// Reads the version field, treating a missing one as `UNVERSIONED`
pub fn version_of(value: &toml::Value) -> u32 {
    value
        .get("version")
        .and_then(toml::Value::as_integer)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(UNVERSIONED)
}

/// Upgrades a parsed config file in place to `CONFIG_VERSION`
///
/// Returns true when anything was changed, so the caller knows to save.
pub fn migrate_to_latest(value: &mut toml::Value) -> ConfigResult<bool> {
    let from = version_of(value);

    if from == CONFIG_VERSION {
        return Ok(false);
    }

    if from > CONFIG_VERSION {
        log::warn!(
            "Config version {} is newer than supported version {}. Attempting to use as-is.",
            from,
            CONFIG_VERSION
        );
        return Ok(false);
    }

    log::info!("Migrating config from version {} to {}", from, CONFIG_VERSION);

    let mut current = from;
    while current < CONFIG_VERSION {
        let next = current + 1;
        match get_migration(next) {
            Some(migration) => {
                migration.migrate(value)?;
                log::info!("Applied migration to version {}", migration.target_version());
            }
            None => log::warn!("No migration defined for version {}, skipping", next),
        }
        current = next;
    }

    let table = value.as_table_mut().ok_or_else(|| ConfigError::MigrationError {
        from,
        reason: "config root is not a table".to_string(),
    })?;
    table.insert(
        "version".to_string(),
        toml::Value::Integer(i64::from(CONFIG_VERSION)),
    );

    Ok(true)
}

fn get_migration(version: u32) -> Option<Box<dyn Migration>> {
    match version {
        2 => Some(Box::new(MigrationV2)),
        _ => None,
    }
}

/// Maps retired translation narrators onto their replacement
struct MigrationV2;

impl Migration for MigrationV2 {
    fn target_version(&self) -> u32 {
        2
    }

    fn migrate(&self, value: &mut toml::Value) -> ConfigResult<()> {
        let Some(audio) = value.get_mut("audio").and_then(toml::Value::as_table_mut) else {
            return Ok(());
        };

        let retired = audio
            .get("secondary_narrator")
            .and_then(toml::Value::as_str)
            .filter(|name| RETIRED_SECONDARY_NARRATORS.contains(name))
            .map(str::to_string);

        if let Some(old) = retired {
            log::info!("Replacing retired translation narrator {} with ur.khan", old);
            audio.insert(
                "secondary_narrator".to_string(),
                toml::Value::String("ur.khan".to_string()),
            );
        }

        Ok(())
    }
}
