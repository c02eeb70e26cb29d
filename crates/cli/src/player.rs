//! Console playback session
//!
//! There is no audio output here. `PreviewSink` stands in for one: each
//! verse "plays" for a fixed clip length, optionally after checking over
//! HTTP that its audio exists, so the whole recitation flow can be followed
//! from a terminal.

use crate::narrators::{engine_settings, ConfigNarrators};
use anyhow::{Context, Result};
use console::{style, Key, Term};
use crossbeam_channel::{unbounded, Receiver};
use recitation_engine::{
    AudioSink, EngineNotification, LoadId, NoopWarmer, PlaybackController, PlaybackEngine,
    PlaybackSnapshot, PlaybackStatus, PositionTracker, Prefetcher, ResourceAddress,
    ResourceLocator, ResourceWarmer, SinkEvent, SinkEventKind, SinkEventSender,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};
use tilawah_config::{watcher::ConfigWatcher, Config, ConfigManager};
use tilawah_core::{Selection, VerseSequence};
use tilawah_network::{Client, ClientConfig, HttpWarmer};
use tilawah_storage::{JsonFileStore, KeyValueStore};
use tokio::runtime::Handle;

const TICK: Duration = Duration::from_millis(50);

// ===== Preview sink =====

struct Clip {
    load: LoadId,
    ready: bool,
    playing: bool,
    finished: bool,
    played: Duration,
    resumed_at: Option<Instant>,
}

impl Clip {
    fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .resumed_at
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default();
        self.played + running
    }

    fn start_clock(&mut self) {
        if self.ready && self.playing && self.resumed_at.is_none() {
            self.resumed_at = Some(Instant::now());
        }
    }
}

struct PreviewState {
    events: Option<SinkEventSender>,
    clip: Option<Clip>,
    rate: f32,
}

impl PreviewState {
    fn send(&self, load: LoadId, kind: SinkEventKind) {
        if let Some(events) = &self.events {
            if events.send(SinkEvent::new(load, kind)).is_err() {
                log::debug!("Engine went away before load {} reported", load);
            }
        }
    }
}

/// Checks a resource before it is reported ready
type Probe = (Client, Handle);

/// Sink that pretends every verse lasts `clip_length`
pub struct PreviewSink {
    state: Arc<Mutex<PreviewState>>,
    probe: Option<Probe>,
    shutdown: Arc<AtomicBool>,
}

fn lock(state: &Mutex<PreviewState>) -> MutexGuard<'_, PreviewState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl PreviewSink {
    pub fn new(clip_length: Duration, probe: Option<Probe>) -> Self {
        let state = Arc::new(Mutex::new(PreviewState {
            events: None,
            clip: None,
            rate: 1.0,
        }));
        let shutdown = Arc::new(AtomicBool::new(false));

        let clock_state = Arc::clone(&state);
        let clock_shutdown = Arc::clone(&shutdown);
        thread::spawn(move || {
            while !clock_shutdown.load(Ordering::SeqCst) {
                thread::sleep(TICK / 5);
                Self::tick(&clock_state, clip_length, Instant::now());
            }
        });

        Self {
            state,
            probe,
            shutdown,
        }
    }

    /// Reports the end of the clip once enough time has passed
    fn tick(state: &Mutex<PreviewState>, clip_length: Duration, now: Instant) {
        let mut state = lock(state);
        let length = clip_length.div_f32(state.rate.max(0.1));

        let ended = match state.clip.as_mut() {
            Some(clip) if !clip.finished && clip.resumed_at.is_some() => {
                if clip.elapsed(now) >= length {
                    clip.finished = true;
                    clip.resumed_at = None;
                    Some(clip.load)
                } else {
                    None
                }
            }
            _ => None,
        };

        if let Some(load) = ended {
            state.send(load, SinkEventKind::Ended);
        }
    }

    fn mark_ready(state: &Mutex<PreviewState>, load: LoadId, outcome: Result<(), String>) {
        let mut state = lock(state);
        let Some(clip) = state.clip.as_mut().filter(|clip| clip.load == load) else {
            return;
        };

        match outcome {
            Ok(()) => {
                clip.ready = true;
                clip.start_clock();
                state.send(load, SinkEventKind::CanPlay);
            }
            Err(reason) => {
                clip.finished = true;
                state.send(load, SinkEventKind::Error(reason));
            }
        }
    }
}

impl AudioSink for PreviewSink {
    fn attach(&mut self, events: SinkEventSender) {
        lock(&self.state).events = Some(events);
    }

    fn detach(&mut self) {
        lock(&self.state).events = None;
    }

    fn load(&mut self, load: LoadId, address: &ResourceAddress) {
        lock(&self.state).clip = Some(Clip {
            load,
            ready: false,
            playing: false,
            finished: false,
            played: Duration::ZERO,
            resumed_at: None,
        });

        match &self.probe {
            Some((client, runtime)) => {
                let client = client.clone();
                let state = Arc::clone(&self.state);
                let url = address.to_string();
                runtime.spawn(async move {
                    let outcome = client.probe(&url).await.map_err(|e| e.to_string());
                    Self::mark_ready(&state, load, outcome);
                });
            }
            None => Self::mark_ready(&self.state, load, Ok(())),
        }
    }

    fn play(&mut self) {
        if let Some(clip) = lock(&self.state).clip.as_mut() {
            clip.playing = true;
            clip.start_clock();
        }
    }

    fn pause(&mut self) {
        if let Some(clip) = lock(&self.state).clip.as_mut() {
            clip.playing = false;
            if let Some(at) = clip.resumed_at.take() {
                clip.played += at.elapsed();
            }
        }
    }

    fn halt(&mut self) {
        lock(&self.state).clip = None;
    }

    fn set_rate(&mut self, rate: f32) {
        lock(&self.state).rate = rate;
    }
}

impl Drop for PreviewSink {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

// ===== Session =====

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub clip_length: Duration,
    /// No HTTP at all: no probing and no prefetching
    pub offline: bool,
    pub probe: bool,
}

/// Where playback should begin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAt {
    Beginning,
    Verse(u32),
}

pub struct PlayRequest {
    pub selection: Selection,
    pub sequence: VerseSequence,
    pub start: StartAt,
}

/// Everything a session needs that can cross into the player thread
pub struct SessionSetup {
    pub config: Config,
    pub config_path: PathBuf,
    pub store: Arc<JsonFileStore>,
    pub runtime: Handle,
    pub options: SessionOptions,
}

type SessionController = PlaybackController<Box<dyn ResourceWarmer>, Arc<JsonFileStore>>;

fn build_controller(setup: &SessionSetup, watcher: &ConfigWatcher) -> Result<SessionController> {
    let client = Client::with_config(ClientConfig {
        timeout: Duration::from_secs(15),
        ..ClientConfig::default()
    })
    .context("Failed to create HTTP client")?;

    let online = !setup.options.offline;
    let warmer: Box<dyn ResourceWarmer> = if online {
        Box::new(HttpWarmer::new(client.clone(), setup.runtime.clone()))
    } else {
        Box::new(NoopWarmer)
    };
    let probe = (online && setup.options.probe).then(|| (client, setup.runtime.clone()));

    let locator = ResourceLocator::new(setup.config.audio.resource_template.clone())
        .context("Invalid audio.resource_template")?;

    let engine = PlaybackEngine::new(
        Box::new(PreviewSink::new(setup.options.clip_length, probe)),
        Box::new(ConfigNarrators::new(watcher.config_handle())),
        Prefetcher::new(warmer),
        PositionTracker::new(Arc::clone(&setup.store)),
    )
    .with_locator(locator)
    .with_settings(engine_settings(&setup.config));

    Ok(PlaybackController::new(engine))
}

/// Puts env and `--data-dir` overrides back on a config re-read from disk
fn reapply_overrides(config: &mut Config, data_dir: Option<&PathBuf>) {
    ConfigManager::apply_process_env(config);
    if let Some(dir) = data_dir {
        config.app.data_dir = Some(dir.clone());
    }
}

/// Runs one interactive playback session until it ends or the user quits
///
/// Blocks the calling thread.
pub fn run(setup: SessionSetup, request: PlayRequest) -> Result<()> {
    let data_dir = setup.config.app.data_dir.clone();
    let watcher = ConfigWatcher::new(setup.config_path.clone(), setup.config.clone())
        .context("Failed to watch config file")?
        .with_reload_hook(move |config| reapply_overrides(config, data_dir.as_ref()));
    let mut controller = build_controller(&setup, &watcher)?;
    let _watch = watcher.start_watching();

    let term = Term::stdout();
    term.write_line(&format!(
        "\n  {} {}",
        style("Reciting").bold().cyan(),
        style(request.selection).bold()
    ))?;
    term.write_line(&format!(
        "  {}",
        style("space: pause/resume   q: stop").dim()
    ))?;

    let keys = spawn_key_reader();
    let _ = term.hide_cursor();
    let result = drive(&mut controller, request, &keys, |line| {
        term.write_line(&line).context("Failed to write to terminal")
    });
    let _ = term.show_cursor();
    result
}

fn spawn_key_reader() -> Receiver<Key> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let term = Term::stdout();
        while let Ok(key) = term.read_key() {
            if tx.send(key).is_err() {
                break;
            }
        }
    });
    rx
}

/// Starts playback and pumps the engine until it stops
///
/// Keys come from `keys`; progress lines go to `out`.
pub fn drive<W, S, F>(
    controller: &mut PlaybackController<W, S>,
    request: PlayRequest,
    keys: &Receiver<Key>,
    mut out: F,
) -> Result<()>
where
    W: ResourceWarmer,
    S: KeyValueStore,
    F: FnMut(String) -> Result<()>,
{
    let notifications = controller.engine_mut().subscribe();

    match request.start {
        StartAt::Beginning => controller.play_selection(request.selection, request.sequence)?,
        StartAt::Verse(global) => {
            controller.play_verse(request.selection, request.sequence, global)?
        }
    };

    let mut last_line = String::new();
    loop {
        controller.engine_mut().wait_events(TICK);
        controller.engine_mut().check_stall(Instant::now());

        while let Ok(key) = keys.try_recv() {
            match key {
                Key::Char(' ') => {
                    controller.toggle();
                }
                Key::Char('q') | Key::Escape => controller.stop(),
                _ => {}
            }
        }

        for notification in notifications.try_iter() {
            if let EngineNotification::StatusChanged(snapshot) = notification {
                if let Some(line) = describe(&snapshot) {
                    if line != last_line {
                        out(line.clone())?;
                        last_line = line;
                    }
                }
            }
        }

        if controller.engine().status() == PlaybackStatus::Stopped {
            out(format!("  {}", style("Stopped").red()))?;
            return Ok(());
        }
    }
}

fn describe(snapshot: &PlaybackSnapshot) -> Option<String> {
    let verse = snapshot.current_verse?;
    let status = match snapshot.status {
        PlaybackStatus::Playing => style("▶").green(),
        PlaybackStatus::Paused => style("⏸").yellow(),
        PlaybackStatus::Stopped => return None,
    };
    Some(format!("  {} {:>7}  {}", status, verse.to_string(), snapshot.stage))
}
