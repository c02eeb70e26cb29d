// FILE: crates/cli/src/commands.rs

use crate::player::{self, PlayRequest, SessionOptions, SessionSetup, StartAt};
use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use console::style;
use recitation_engine::PositionTracker;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tilawah_config::{Config, ConfigManager, TranslationLanguage};
use tilawah_core::{
    Catalog, CatalogProvider, ChapterId, FallbackProvider, JuzNumber, Selection, Verse,
    VerseProvider, VerseSequence,
};
use tilawah_network::{ApiVerseProvider, Client, ClientConfig};
use tilawah_storage::{BookmarkStore, JsonFileStore};

/// Loaded settings plus where they came from
pub struct AppContext {
    pub manager: ConfigManager,
    pub config: Config,
}

impl AppContext {
    /// Resolves the config directory and loads the config with env overrides
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let manager = match matches.get_one::<PathBuf>("config-dir") {
            Some(dir) => ConfigManager::with_directory(dir.clone()),
            None => ConfigManager::new(),
        }
        .context("Failed to locate config directory")?;

        let mut config = manager
            .load_with_env_overrides()
            .context("Failed to load config")?;
        if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
            config.app.data_dir = Some(dir.clone());
        }

        Ok(Self { manager, config })
    }

    /// Opens the key-value store holding reading progress and bookmarks
    pub fn store(&self) -> Result<Arc<JsonFileStore>> {
        let data_dir = self
            .manager
            .data_dir(&self.config)
            .context("Failed to locate data directory")?;
        let store = JsonFileStore::open_in(&data_dir)
            .with_context(|| format!("Failed to open store in {}", data_dir.display()))?;
        Ok(Arc::new(store))
    }
}

// ===== Playback =====

/// Play a chapter, a juz, or a chapter from one verse
pub async fn play(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let selection = selection_from(matches)?;
    let options = session_options(matches)?;
    let sequence = load_sequence(selection, options.offline).await?;

    let start = match (selection, matches.get_one::<u16>("verse")) {
        (Selection::Chapter(chapter), Some(&local)) => {
            StartAt::Verse(Catalog::global_index(chapter, local)?)
        }
        (Selection::Juz(_), Some(_)) => bail!("--verse can only be used with --chapter"),
        (_, None) => StartAt::Beginning,
    };

    run_session(
        ctx,
        PlayRequest {
            selection,
            sequence,
            start,
        },
        options,
    )
    .await
}

/// Show, forget, or continue from the last read position
pub async fn resume(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let tracker = PositionTracker::new(ctx.store()?);

    if matches.get_flag("forget") {
        tracker.reset().context("Failed to forget last read position")?;
        println!("{} Last read position cleared", style("✓").green().bold());
        return Ok(());
    }

    let Some(position) = tracker.read() else {
        println!("Nothing to continue yet. Use 'play' to start reciting.");
        return Ok(());
    };
    let global = position.resume_global_index()?;
    println!(
        "Continue from {} (verse {} of the Quran)",
        style(position).bold().cyan(),
        global
    );

    if matches.get_flag("play") {
        let selection = Selection::Chapter(position.chapter_id);
        run_session(
            ctx,
            PlayRequest {
                selection,
                sequence: Catalog::chapter_sequence(position.chapter_id),
                start: StartAt::Verse(global),
            },
            session_options(matches)?,
        )
        .await?;
    }
    Ok(())
}

/// Loads verses from the API, falling back to the built-in catalog
///
/// Offline sessions use the catalog directly.
async fn load_sequence(selection: Selection, offline: bool) -> Result<VerseSequence> {
    if offline {
        return CatalogProvider
            .load(&selection)
            .with_context(|| format!("Failed to load verses for {}", selection));
    }

    let client = Client::with_config(ClientConfig {
        timeout: Duration::from_secs(15),
        ..ClientConfig::default()
    })
    .context("Failed to create HTTP client")?;
    let provider = FallbackProvider::new(
        ApiVerseProvider::new(client, tokio::runtime::Handle::current()),
        CatalogProvider,
    );

    tokio::task::spawn_blocking(move || provider.load_or_none(&selection))
        .await
        .context("Verse loader panicked")?
        .ok_or_else(|| anyhow!("No verses available for {}", selection))
}

async fn run_session(ctx: &AppContext, request: PlayRequest, options: SessionOptions) -> Result<()> {
    let setup = SessionSetup {
        config: ctx.config.clone(),
        config_path: ctx.manager.config_path(),
        store: ctx.store()?,
        runtime: tokio::runtime::Handle::current(),
        options,
    };

    tokio::task::spawn_blocking(move || player::run(setup, request))
        .await
        .context("Player thread panicked")?
}

fn session_options(matches: &ArgMatches) -> Result<SessionOptions> {
    let clip_secs = matches.get_one::<f64>("clip").copied().unwrap_or(3.0);
    let clip_length = Duration::try_from_secs_f64(clip_secs.max(0.0))
        .with_context(|| format!("Invalid --clip value: {}", clip_secs))?;
    Ok(SessionOptions {
        clip_length,
        offline: matches.get_flag("offline"),
        probe: !matches.get_flag("no-probe"),
    })
}

fn selection_from(matches: &ArgMatches) -> Result<Selection> {
    if let Some(&chapter) = matches.get_one::<u16>("chapter") {
        return Ok(Selection::Chapter(ChapterId::new(chapter)?));
    }
    if let Some(&juz) = matches.get_one::<u8>("juz") {
        return Ok(Selection::Juz(JuzNumber::new(juz)?));
    }
    Err(anyhow!("Either --chapter or --juz is required"))
}

// ===== Bookmarks =====

pub fn bookmark(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let bookmarks = BookmarkStore::new(ctx.store()?);

    match matches.subcommand() {
        Some(("toggle", sub)) => {
            let verse = verse_from(sub)?;
            if bookmarks.toggle(&verse).context("Failed to update bookmarks")? {
                println!("{} Bookmarked {}", style("✓").green().bold(), verse);
            } else {
                println!("{} Removed bookmark {}", style("✗").red().bold(), verse);
            }
        }
        Some(("list", _)) => {
            let list = bookmarks.list().context("Failed to read bookmarks")?;
            if list.is_empty() {
                println!("No bookmarks yet. Use 'bookmark toggle' to add one.");
                return Ok(());
            }

            println!("\n{} Bookmarks", style(list.len()).bold().cyan());
            println!("{}", "=".repeat(40));
            for bookmark in list {
                println!(
                    "  {:<8} verse {:>4}",
                    style(&bookmark.id).bold(),
                    bookmark.global_index
                );
            }
        }
        Some(("remove", sub)) => {
            let id = sub
                .get_one::<String>("id")
                .ok_or_else(|| anyhow!("Bookmark id is required"))?;
            if bookmarks.remove(id).context("Failed to update bookmarks")? {
                println!("{} Removed bookmark {}", style("✓").green().bold(), id);
            } else {
                println!("No bookmark with id '{}'", id);
            }
        }
        Some(("clear", _)) => {
            bookmarks.clear().context("Failed to clear bookmarks")?;
            println!("{} All bookmarks removed", style("✓").green().bold());
        }
        _ => bail!("Unknown bookmark command"),
    }
    Ok(())
}

fn verse_from(matches: &ArgMatches) -> Result<Verse> {
    let chapter = matches
        .get_one::<u16>("chapter")
        .ok_or_else(|| anyhow!("--chapter is required"))?;
    let local = matches
        .get_one::<u16>("verse")
        .ok_or_else(|| anyhow!("--verse is required"))?;

    let global = Catalog::global_index(ChapterId::new(*chapter)?, *local)?;
    Ok(Catalog::locate_global(global)?)
}

// ===== Settings =====

pub fn config(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => print_config(ctx),
        Some(("path", _)) => println!("{}", ctx.manager.config_path().display()),
        Some(("set-narrator", sub)) => {
            let primary = sub.get_one::<String>("primary").cloned();
            let secondary = sub.get_one::<String>("secondary").cloned();
            if primary.is_none() && secondary.is_none() {
                bail!("Pass --primary and/or --secondary");
            }

            ctx.manager
                .update(|config| {
                    if let Some(primary) = primary {
                        config.audio.primary_narrator = primary;
                    }
                    if let Some(secondary) = secondary {
                        config.audio.secondary_narrator = secondary;
                    }
                })
                .context("Failed to save narrators")?;
            println!("{} Narrators updated", style("✓").green().bold());
        }
        Some(("set-language", sub)) => {
            let language: TranslationLanguage = sub
                .get_one::<String>("language")
                .ok_or_else(|| anyhow!("Language is required"))?
                .parse()?;

            ctx.manager
                .update(|config| {
                    config.reading.translation_language = language;
                    config.sync_secondary_with_language();
                })
                .context("Failed to save language")?;
            println!(
                "{} Translation language set to {}",
                style("✓").green().bold(),
                language
            );
        }
        Some(("set-rate", sub)) => {
            let rate = *sub
                .get_one::<f32>("rate")
                .ok_or_else(|| anyhow!("Rate is required"))?;
            ctx.manager
                .update(|config| config.audio.playback_rate = rate)
                .context("Failed to save playback rate")?;
            println!("{} Playback rate set to {:.2}x", style("✓").green().bold(), rate);
        }
        Some(("reset", _)) => {
            ctx.manager.reset().context("Failed to reset config")?;
            println!("{} Settings restored to defaults", style("✓").green().bold());
        }
        _ => bail!("Unknown config command"),
    }
    Ok(())
}

fn print_config(ctx: &AppContext) {
    let config = &ctx.config;

    println!("\n{}", style("Settings").bold().cyan());
    println!("{}", "=".repeat(40));
    println!("Reciter:       {}", config.audio.primary_narrator);
    println!(
        "Translation:   {}",
        config.audio.secondary().unwrap_or("off")
    );
    println!("Language:      {}", config.reading.translation_language);
    println!("Rate:          {:.2}x", config.audio.playback_rate);
    println!("Look-ahead:    {} verses", config.audio.prefetch_depth);
    match config.audio.stall_timeout_secs {
        0 => println!("Stall skip:    off"),
        secs => println!("Stall skip:    after {}s", secs),
    }
    println!("Audio source:  {}", config.audio.resource_template);
    println!("Log level:     {}", config.app.log_level);

    if let Err(errors) = config.validate() {
        println!("\n{}", style("Problems").bold().yellow());
        for error in errors {
            println!("  - {}", error);
        }
    }
}

#[cfg(test)]
mod tests;
