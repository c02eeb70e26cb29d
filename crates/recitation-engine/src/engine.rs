//! Playback state machine
//!
//! The engine owns one sink and walks the active sequence verse by verse,
//! playing the recitation of each verse and then, if a translation narrator
//! is configured, its translation. Every transition happens on the caller's
//! thread: sink events arrive on a channel and are applied by
//! `handle_event`/`pump_events` one at a time.

use crate::context::PlaybackContextHolder;
use crate::error::{EngineError, EngineResult};
use crate::locator::{ResourceAddress, ResourceLocator};
use crate::narrator::{NarratorSelection, NarratorSource};
use crate::observer::{EngineNotification, Observers};
use crate::prefetch::{self, Prefetcher, ResourceWarmer};
use crate::sink::{AudioSink, LoadId, SinkEvent, SinkEventKind};
use crate::state::{PlaybackSnapshot, PlaybackState, PlaybackStatus, Stage};
use crate::tracker::PositionTracker;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use tilawah_core::{Selection, Verse, VerseSequence};
use tilawah_storage::KeyValueStore;

/// Tunables read once at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Following verses to warm ahead of the current one
    pub prefetch_depth: usize,
    /// Skip a resource that has not become ready within this time
    pub stall_timeout: Option<Duration>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            prefetch_depth: 3,
            stall_timeout: None,
        }
    }
}

/// The (verse, stage) currently handed to the sink
#[derive(Debug, Clone)]
struct Target {
    load: LoadId,
    verse: Verse,
    stage: Stage,
    address: ResourceAddress,
    resolved_at: Instant,
    ready: bool,
    /// Ended or failed while paused
    finished: bool,
}

enum Resume {
    Reuse,
    Resolve,
    Advance,
}

pub struct PlaybackEngine<W, S> {
    sink: Box<dyn AudioSink>,
    narrators: Box<dyn NarratorSource>,
    locator: ResourceLocator,
    prefetcher: Prefetcher<W>,
    tracker: PositionTracker<S>,
    context: PlaybackContextHolder,
    observers: Observers,
    settings: EngineSettings,
    state: PlaybackState,
    sequence: VerseSequence,
    target: Option<Target>,
    last_load: LoadId,
    events_tx: Sender<SinkEvent>,
    events_rx: Receiver<SinkEvent>,
    attached: bool,
}

impl<W: ResourceWarmer, S: KeyValueStore> PlaybackEngine<W, S> {
    pub fn new(
        sink: Box<dyn AudioSink>,
        narrators: Box<dyn NarratorSource>,
        prefetcher: Prefetcher<W>,
        tracker: PositionTracker<S>,
    ) -> Self {
        let (events_tx, events_rx) = unbounded();

        Self {
            sink,
            narrators,
            locator: ResourceLocator::default(),
            prefetcher,
            tracker,
            context: PlaybackContextHolder::new(),
            observers: Observers::new(),
            settings: EngineSettings::default(),
            state: PlaybackState::new(),
            sequence: VerseSequence::empty(),
            target: None,
            last_load: LoadId::new(0),
            events_tx,
            events_rx,
            attached: false,
        }
    }

    pub fn with_locator(mut self, locator: ResourceLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    // ===== Commands =====

    /// Starts playing `sequence` at `position`, from any state
    ///
    /// The playback context is left as it is.
    pub fn start(&mut self, sequence: VerseSequence, position: usize) -> EngineResult<()> {
        Self::check_start(&sequence, position)?;
        self.begin(sequence, position);
        Ok(())
    }

    /// Starts playback on behalf of a chapter or juz
    pub fn start_from(
        &mut self,
        selection: Selection,
        sequence: VerseSequence,
        position: usize,
    ) -> EngineResult<()> {
        Self::check_start(&sequence, position)?;
        self.context.set(selection);
        self.begin(sequence, position);
        Ok(())
    }

    fn check_start(sequence: &VerseSequence, position: usize) -> EngineResult<()> {
        if sequence.is_empty() {
            return Err(EngineError::EmptySequence);
        }
        if position >= sequence.len() {
            return Err(EngineError::PositionOutOfRange {
                position,
                len: sequence.len(),
            });
        }
        Ok(())
    }

    fn begin(&mut self, sequence: VerseSequence, position: usize) {
        if !self.attached {
            self.sink.attach(self.events_tx.clone());
            self.attached = true;
        }

        self.sequence = sequence;
        self.state.begin(position);
        if let Some(verse) = self.sequence.get(position) {
            log::info!("Starting playback at verse {}", verse);
        }
        self.resolve();
    }

    /// Switches between playing and paused
    ///
    /// Does nothing while stopped. Returns the status afterwards.
    pub fn toggle_pause(&mut self) -> PlaybackStatus {
        match self.state.status() {
            PlaybackStatus::Stopped => log::debug!("Pause toggle ignored while stopped"),
            PlaybackStatus::Playing => {
                self.sink.pause();
                self.state.set_status(PlaybackStatus::Paused);
                log::info!("Playback paused");
                self.notify_status();
            }
            PlaybackStatus::Paused => self.resume(),
        }
        self.state.status()
    }

    fn resume(&mut self) {
        self.state.set_status(PlaybackStatus::Playing);
        log::info!("Playback resumed");
        let narrators = self.narrators.current();

        if self.state.stage() == Stage::Secondary && !narrators.has_secondary() {
            log::info!("Translation narration was turned off while paused, moving on");
            self.advance_with(&narrators);
            return;
        }

        let wanted = self.address_for(&narrators);
        let decision = match &self.target {
            Some(target) if target.finished => Resume::Advance,
            Some(target) if Some(&target.address) == wanted.as_ref() => Resume::Reuse,
            _ => Resume::Resolve,
        };

        match decision {
            Resume::Reuse => {
                if let Some(target) = self.target.as_mut() {
                    target.resolved_at = Instant::now();
                }
                self.sink.set_rate(narrators.rate);
                self.sink.play();
                self.notify_status();
            }
            Resume::Resolve => self.resolve_with(&narrators),
            Resume::Advance => self.advance_with(&narrators),
        }
    }

    /// Stops playback and resets all session state
    pub fn stop(&mut self) {
        let was_active = self.state.status() != PlaybackStatus::Stopped;

        // Nothing from the old session may arrive after this point
        if self.attached {
            self.sink.detach();
            self.attached = false;
        }
        let dropped = self.events_rx.try_iter().count();
        if dropped > 0 {
            log::debug!("Dropped {} sink events on stop", dropped);
        }
        self.sink.halt();

        self.state.reset();
        self.sequence = VerseSequence::empty();
        self.target = None;
        self.context.clear();
        self.prefetcher.clear();

        if was_active {
            log::info!("Playback stopped");
            self.observers.notify(EngineNotification::Stopped);
            self.notify_status();
        }
    }

    // ===== Sink events =====

    /// Applies one sink event
    ///
    /// Returns false if the event was stale and ignored.
    pub fn handle_event(&mut self, event: SinkEvent) -> bool {
        let paused = self.state.status() == PlaybackStatus::Paused;
        let Some(target) = self.target.as_mut() else {
            log::debug!("Ignoring {:?} with nothing loaded", event.kind);
            return false;
        };
        if target.load != event.load {
            log::debug!(
                "Ignoring stale {:?} for load {} (current {})",
                event.kind,
                event.load,
                target.load
            );
            return false;
        }

        match event.kind {
            SinkEventKind::CanPlay => {
                target.ready = true;
                let global = target.verse.global_index;
                self.state.set_pending(None);
                self.observers.notify(EngineNotification::Ready(global));
                self.notify_status();
            }
            SinkEventKind::Ended | SinkEventKind::Error(_) => {
                if let SinkEventKind::Error(reason) = &event.kind {
                    log::error!(
                        "Failed to load {} audio for verse {}, skipping: {}",
                        target.stage,
                        target.verse,
                        reason
                    );
                }

                if paused {
                    target.finished = true;
                } else {
                    self.advance();
                }
            }
        }
        true
    }

    /// Applies every queued sink event, returning how many were current
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.handle_event(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits up to `timeout` for a sink event, then applies all queued ones
    pub fn wait_events(&mut self, timeout: Duration) -> usize {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => usize::from(self.handle_event(event)) + self.pump_events(),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Skips the current resource if it has been buffering too long
    ///
    /// Only active when a stall timeout is configured. Returns true if
    /// playback was advanced.
    pub fn check_stall(&mut self, now: Instant) -> bool {
        let Some(timeout) = self.settings.stall_timeout else {
            return false;
        };
        if self.state.status() != PlaybackStatus::Playing {
            return false;
        }

        let stalled = match &self.target {
            Some(target) => {
                !target.ready && now.saturating_duration_since(target.resolved_at) >= timeout
            }
            None => false,
        };

        if stalled {
            if let Some(target) = &self.target {
                log::warn!(
                    "Audio for verse {} did not become ready within {:?}, skipping",
                    target.verse,
                    timeout
                );
            }
            self.advance();
        }
        stalled
    }

    // ===== Transitions =====

    fn advance(&mut self) {
        let narrators = self.narrators.current();
        self.advance_with(&narrators);
    }

    fn advance_with(&mut self, narrators: &NarratorSelection) {
        let Some(position) = self.state.position() else {
            return;
        };

        if self.state.stage() == Stage::Primary && narrators.has_secondary() {
            self.state.set_stage(Stage::Secondary);
            self.resolve_with(narrators);
            return;
        }

        let next = position + 1;
        if next < self.sequence.len() {
            self.state.move_to(next);
            self.resolve_with(narrators);
        } else {
            log::info!("Reached the end of the sequence");
            self.stop();
        }
    }

    fn resolve(&mut self) {
        let narrators = self.narrators.current();
        self.resolve_with(&narrators);
    }

    /// Hands the current (verse, stage) to the sink
    fn resolve_with(&mut self, narrators: &NarratorSelection) {
        let Some(position) = self.state.position() else {
            return;
        };
        let Some(verse) = self.sequence.get(position).copied() else {
            self.stop();
            return;
        };
        let stage = self.state.stage();
        let Some(narrator) = Self::narrator_for(stage, narrators) else {
            // Translation stage with translation narration turned off
            self.advance_with(narrators);
            return;
        };

        let load = self.last_load.next();
        self.last_load = load;
        let address = self.locator.locate(verse.global_index, narrator);
        log::debug!("Loading {} of verse {} from {}", stage, verse, address);

        self.sink.set_rate(narrators.rate);
        self.sink.load(load, &address);
        self.sink.play();

        self.state.set_pending(Some(verse.global_index));
        self.target = Some(Target {
            load,
            verse,
            stage,
            address,
            resolved_at: Instant::now(),
            ready: false,
            finished: false,
        });

        if stage == Stage::Primary {
            self.tracker.record(verse.chapter_id, verse.local_index);
        }

        let upcoming = prefetch::lookahead(
            &self.locator,
            &self.sequence,
            position,
            stage,
            narrators,
            self.settings.prefetch_depth,
        );
        self.prefetcher.schedule(upcoming);

        self.observers
            .notify(EngineNotification::ScrollTo(verse.global_index));
        self.observers
            .notify(EngineNotification::Loading(verse.global_index));
        self.notify_status();
    }

    fn narrator_for(stage: Stage, narrators: &NarratorSelection) -> Option<&str> {
        match stage {
            Stage::Primary => Some(narrators.primary.as_str()),
            Stage::Secondary => narrators.secondary(),
        }
    }

    fn address_for(&self, narrators: &NarratorSelection) -> Option<ResourceAddress> {
        let verse = self.current_verse()?;
        let narrator = Self::narrator_for(self.state.stage(), narrators)?;
        Some(self.locator.locate(verse.global_index, narrator))
    }

    fn notify_status(&mut self) {
        let snapshot = self.snapshot();
        self.observers
            .notify(EngineNotification::StatusChanged(snapshot));
    }

    // ===== Queries =====

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.state.status(),
            stage: self.state.stage(),
            position: self.state.position(),
            current_verse: self.current_verse(),
            pending_verse: self.state.pending_verse(),
            context: self.context.get(),
            sequence_len: self.sequence.len(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<EngineNotification> {
        self.observers.subscribe()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_verse(&self) -> Option<Verse> {
        self.state
            .position()
            .and_then(|position| self.sequence.get(position).copied())
    }

    pub fn sequence(&self) -> &VerseSequence {
        &self.sequence
    }

    pub fn context(&self) -> Option<Selection> {
        self.context.get()
    }

    /// Re-labels the active playback without restarting it
    pub fn set_context(&mut self, selection: Selection) {
        self.context.set(selection);
    }

    pub fn tracker(&self) -> &PositionTracker<S> {
        &self.tracker
    }

    pub fn prefetcher(&self) -> &Prefetcher<W> {
        &self.prefetcher
    }

    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }
}
