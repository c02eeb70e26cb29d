use super::*;
use crate::build_cli;
use tempfile::TempDir;
use tilawah_storage::{KeyValueStore, LAST_READ_KEY};

fn context_in(dir: &TempDir) -> AppContext {
    let config_dir = dir.path().join("config");
    let data_dir = dir.path().join("data");
    let matches = build_cli().get_matches_from([
        "tilawah",
        "--config-dir",
        config_dir.to_str().unwrap(),
        "--data-dir",
        data_dir.to_str().unwrap(),
        "config",
        "show",
    ]);
    AppContext::from_matches(&matches).unwrap()
}

fn sub(args: &[&str]) -> ArgMatches {
    let mut full = vec!["tilawah"];
    full.extend_from_slice(args);
    let matches = build_cli().get_matches_from(full);
    let (_, sub) = matches.subcommand().unwrap();
    sub.clone()
}

#[test]
fn test_cli_definition_is_consistent() {
    build_cli().debug_assert();
}

#[test]
fn test_selection_from_chapter_and_juz() {
    let chapter = sub(&["play", "--chapter", "18"]);
    assert_eq!(
        selection_from(&chapter).unwrap(),
        Selection::Chapter(ChapterId::new(18).unwrap())
    );

    let juz = sub(&["play", "--juz", "30"]);
    assert_eq!(
        selection_from(&juz).unwrap(),
        Selection::Juz(JuzNumber::new(30).unwrap())
    );
}

#[test]
fn test_play_rejects_out_of_range_chapter() {
    let result = build_cli().try_get_matches_from(["tilawah", "play", "--chapter", "115"]);
    assert!(result.is_err());

    let result = build_cli().try_get_matches_from(["tilawah", "play", "--juz", "3", "--verse", "1"]);
    assert!(result.is_err());
}

#[test]
fn test_session_options() {
    let options = session_options(&sub(&["play", "--chapter", "1", "--clip", "0.5", "--offline"])).unwrap();
    assert_eq!(options.clip_length, Duration::from_millis(500));
    assert!(options.offline);
    assert!(options.probe);

    let options = session_options(&sub(&["resume", "--no-probe"])).unwrap();
    assert_eq!(options.clip_length, Duration::from_secs(3));
    assert!(!options.probe);
}

#[test]
fn test_unrepresentable_clip_rejected() {
    let result = session_options(&sub(&["play", "--chapter", "1", "--clip", "inf"]));
    assert!(result.is_err());
}

#[test]
fn test_verse_from_resolves_global_index() {
    let matches = sub(&["bookmark", "toggle", "--chapter", "2", "--verse", "255"]);
    let (_, toggle) = matches.subcommand().unwrap();
    assert_eq!(verse_from(toggle).unwrap().global_index, 262);
}

#[test]
fn test_verse_past_chapter_end_rejected() {
    let matches = sub(&["bookmark", "toggle", "--chapter", "1", "--verse", "8"]);
    let (_, toggle) = matches.subcommand().unwrap();
    assert!(verse_from(toggle).is_err());
}

#[test]
fn test_bookmark_toggle_and_clear() {
    let dir = TempDir::new().unwrap();
    let ctx = context_in(&dir);

    bookmark(&ctx, &sub(&["bookmark", "toggle", "-c", "2", "-v", "255"])).unwrap();
    bookmark(&ctx, &sub(&["bookmark", "toggle", "-c", "1", "-v", "1"])).unwrap();

    let store = BookmarkStore::new(ctx.store().unwrap());
    let ids: Vec<String> = store.list().unwrap().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["1-1", "2-255"]);

    bookmark(&ctx, &sub(&["bookmark", "toggle", "-c", "1", "-v", "1"])).unwrap();
    assert_eq!(store.list().unwrap().len(), 1);

    bookmark(&ctx, &sub(&["bookmark", "remove", "2-255"])).unwrap();
    assert!(store.list().unwrap().is_empty());

    bookmark(&ctx, &sub(&["bookmark", "toggle", "-c", "1", "-v", "2"])).unwrap();
    bookmark(&ctx, &sub(&["bookmark", "clear"])).unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_set_narrator_and_language() {
    let dir = TempDir::new().unwrap();
    let ctx = context_in(&dir);

    config(&ctx, &sub(&["config", "set-narrator", "--primary", "ar.hudhaify"])).unwrap();
    config(&ctx, &sub(&["config", "set-language", "english"])).unwrap();

    let saved = ctx.manager.load().unwrap();
    assert_eq!(saved.audio.primary_narrator, "ar.hudhaify");
    assert_eq!(saved.reading.translation_language, TranslationLanguage::English);
    assert_eq!(saved.audio.secondary_narrator, "en.walk");
}

#[test]
fn test_set_narrator_requires_a_value() {
    let dir = TempDir::new().unwrap();
    let ctx = context_in(&dir);
    assert!(config(&ctx, &sub(&["config", "set-narrator"])).is_err());
}

#[test]
fn test_invalid_rate_not_saved() {
    let dir = TempDir::new().unwrap();
    let ctx = context_in(&dir);

    assert!(config(&ctx, &sub(&["config", "set-rate", "4.0"])).is_err());
    assert_eq!(ctx.manager.load().unwrap().audio.playback_rate, 1.0);
}

#[test]
fn test_config_reset() {
    let dir = TempDir::new().unwrap();
    let ctx = context_in(&dir);

    config(&ctx, &sub(&["config", "set-narrator", "--secondary", "none"])).unwrap();
    config(&ctx, &sub(&["config", "reset"])).unwrap();
    assert_eq!(ctx.manager.load().unwrap(), Config::default());
}

#[tokio::test]
async fn test_resume_forget_clears_position() {
    let dir = TempDir::new().unwrap();
    let ctx = context_in(&dir);
    PositionTracker::new(ctx.store().unwrap()).record(ChapterId::new(18).unwrap(), 10);

    resume(&ctx, &sub(&["resume", "--forget"])).await.unwrap();

    let store = ctx.store().unwrap();
    assert_eq!(store.get(LAST_READ_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_resume_without_position_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let ctx = context_in(&dir);
    resume(&ctx, &sub(&["resume"])).await.unwrap();
}

#[tokio::test]
async fn test_offline_sequence_comes_from_catalog() {
    let selection = Selection::Juz(JuzNumber::new(30).unwrap());
    let sequence = load_sequence(selection, true).await.unwrap();
    assert_eq!(
        sequence.first().map(|v| v.global_index),
        Some(Catalog::juz_start_global(JuzNumber::new(30).unwrap()))
    );
}
