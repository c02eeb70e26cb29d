// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};
use std::path::PathBuf;

mod commands;
mod narrators;
mod player;

fn chapter_arg() -> Arg {
    Arg::new("chapter")
        .short('c')
        .long("chapter")
        .value_name("N")
        .help("Chapter (surah) number, 1-114")
        .value_parser(value_parser!(u16).range(1..=114))
}

fn verse_arg() -> Arg {
    Arg::new("verse")
        .short('v')
        .long("verse")
        .value_name("V")
        .help("Verse number within the chapter")
        .value_parser(value_parser!(u16).range(1..))
}

fn session_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("clip")
                .long("clip")
                .value_name("SECONDS")
                .help("How long each verse is shown as playing")
                .value_parser(value_parser!(f64))
                .default_value("3"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .help("Do not touch the network (no probing, no prefetching)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-probe")
                .long("no-probe")
                .help("Treat every verse as available without checking")
                .action(ArgAction::SetTrue),
        )
}

fn build_cli() -> Command {
    Command::new("tilawah")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Verse-by-verse Quran recitation with translation narration")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding reading progress and bookmarks")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(Command::new("init").about("Write a default config file if none exists"))
        .subcommand(session_args(
            Command::new("play")
                .about("Recite a chapter or juz")
                .arg(chapter_arg())
                .arg(
                    Arg::new("juz")
                        .short('j')
                        .long("juz")
                        .value_name("N")
                        .help("Juz number, 1-30")
                        .value_parser(value_parser!(u8).range(1..=30)),
                )
                .arg(verse_arg().requires("chapter").conflicts_with("juz"))
                .group(
                    ArgGroup::new("unit")
                        .args(["chapter", "juz"])
                        .required(true),
                ),
        ))
        .subcommand(session_args(
            Command::new("resume")
                .about("Show where you stopped reading")
                .arg(
                    Arg::new("play")
                        .short('p')
                        .long("play")
                        .help("Continue reciting from there")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("forget")
                        .long("forget")
                        .help("Clear the saved position")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("play"),
                ),
        ))
        .subcommand(
            Command::new("bookmark")
                .about("Manage bookmarked verses")
                .subcommand_required(true)
                .subcommand(
                    Command::new("toggle")
                        .about("Add or remove a bookmark")
                        .arg(chapter_arg().required(true))
                        .arg(verse_arg().required(true)),
                )
                .subcommand(Command::new("list").about("List bookmarks in reading order"))
                .subcommand(
                    Command::new("remove")
                        .about("Remove a bookmark by id")
                        .arg(Arg::new("id").required(true).value_name("ID").help("Bookmark id, e.g. 2-255")),
                )
                .subcommand(Command::new("clear").about("Remove every bookmark")),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the effective settings"))
                .subcommand(Command::new("path").about("Print the config file location"))
                .subcommand(
                    Command::new("set-narrator")
                        .about("Choose the reciter and translation narrator")
                        .arg(Arg::new("primary").long("primary").value_name("ID").help("Reciter, e.g. ar.alafasy"))
                        .arg(
                            Arg::new("secondary")
                                .long("secondary")
                                .value_name("ID")
                                .help("Translation narrator, or 'none' to turn translation off"),
                        ),
                )
                .subcommand(
                    Command::new("set-language")
                        .about("Choose the translation language")
                        .arg(
                            Arg::new("language")
                                .required(true)
                                .value_name("LANGUAGE")
                                .value_parser(["english", "urdu"]),
                        ),
                )
                .subcommand(
                    Command::new("set-rate")
                        .about("Set the playback rate")
                        .arg(
                            Arg::new("rate")
                                .required(true)
                                .value_name("RATE")
                                .value_parser(value_parser!(f32)),
                        ),
                )
                .subcommand(Command::new("reset").about("Restore default settings")),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let context = commands::AppContext::from_matches(&matches)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(context.config.app.log_level.to_string()),
    )
    .init();
    log::debug!("Using config at {}", context.manager.config_path().display());

    match matches.subcommand() {
        Some(("init", _)) => {
            if context.manager.initialize().context("Failed to write config")? {
                println!("Config written to {}", context.manager.config_path().display());
            } else {
                println!("Config already exists at {}", context.manager.config_path().display());
            }
            Ok(())
        }
        Some(("play", sub_matches)) => commands::play(&context, sub_matches).await,
        Some(("resume", sub_matches)) => commands::resume(&context, sub_matches).await,
        Some(("bookmark", sub_matches)) => commands::bookmark(&context, sub_matches),
        Some(("config", sub_matches)) => commands::config(&context, sub_matches),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
