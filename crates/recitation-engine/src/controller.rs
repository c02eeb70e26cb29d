//! Call-site policy over the engine
//!
//! Pressing "play" on the chapter or juz that is already playing pauses or
//! resumes it instead of starting over. The same goes for the play button
//! of the verse currently in the player.

use crate::engine::PlaybackEngine;
use crate::error::{EngineError, EngineResult};
use crate::prefetch::ResourceWarmer;
use crate::state::PlaybackStatus;
use tilawah_core::{Selection, VerseSequence};
use tilawah_storage::KeyValueStore;

/// What a play request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback (re)started from the requested verse
    Started,
    /// The request matched the active playback and only toggled pause
    Toggled(PlaybackStatus),
}

/// Screen the user is looking at, as far as the mini player cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Reading(Selection),
    Settings,
}

pub struct PlaybackController<W, S> {
    engine: PlaybackEngine<W, S>,
}

impl<W: ResourceWarmer, S: KeyValueStore> PlaybackController<W, S> {
    pub fn new(engine: PlaybackEngine<W, S>) -> Self {
        Self { engine }
    }

    /// Plays a whole chapter or juz from its first verse
    pub fn play_selection(
        &mut self,
        selection: Selection,
        sequence: VerseSequence,
    ) -> EngineResult<PlayOutcome> {
        if self.engine.status() != PlaybackStatus::Stopped
            && self.engine.context() == Some(selection)
        {
            log::debug!("{} is already playing, toggling pause", selection);
            return Ok(PlayOutcome::Toggled(self.engine.toggle_pause()));
        }

        self.engine.stop();
        self.engine.start_from(selection, sequence, 0)?;
        Ok(PlayOutcome::Started)
    }

    /// Plays from one verse of a chapter or juz
    pub fn play_verse(
        &mut self,
        selection: Selection,
        sequence: VerseSequence,
        global_index: u32,
    ) -> EngineResult<PlayOutcome> {
        let current = self.engine.current_verse().map(|verse| verse.global_index);
        if self.engine.status() != PlaybackStatus::Stopped && current == Some(global_index) {
            return Ok(PlayOutcome::Toggled(self.engine.toggle_pause()));
        }

        let position = sequence
            .position_of(global_index)
            .ok_or(EngineError::VerseNotInSequence(global_index))?;
        self.engine.start_from(selection, sequence, position)?;
        Ok(PlayOutcome::Started)
    }

    pub fn toggle(&mut self) -> PlaybackStatus {
        self.engine.toggle_pause()
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Where "open player" should take the user
    ///
    /// The playing container and the verse to scroll to, or `None` when
    /// nothing is playing.
    pub fn navigate_to_player(&self) -> Option<(Selection, u32)> {
        let context = self.engine.context()?;
        let verse = self.engine.current_verse()?;
        Some((context, verse.global_index))
    }

    /// Whether the mini player should be shown over `view`
    pub fn now_playing_visible(&self, view: &View) -> bool {
        if self.engine.status() == PlaybackStatus::Stopped
            || self.engine.current_verse().is_none()
        {
            return false;
        }

        match view {
            View::Settings => false,
            View::Reading(selection) => self.engine.context() != Some(*selection),
            View::Home => true,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine<W, S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlaybackEngine<W, S> {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::NarratorSelection;
    use crate::prefetch::{NoopWarmer, Prefetcher};
    use crate::sink::SinkEventKind;
    use crate::testing::RecordingSink;
    use crate::tracker::PositionTracker;
    use tilawah_core::{Catalog, ChapterId, JuzNumber};
    use tilawah_storage::MemoryStore;

    fn controller() -> (PlaybackController<NoopWarmer, MemoryStore>, RecordingSink) {
        let sink = RecordingSink::new();
        let engine = PlaybackEngine::new(
            Box::new(sink.clone()),
            Box::new(NarratorSelection::primary_only("ar.alafasy")),
            Prefetcher::new(NoopWarmer),
            PositionTracker::new(MemoryStore::new()),
        );
        (PlaybackController::new(engine), sink)
    }

    fn chapter(n: u16) -> (Selection, VerseSequence) {
        let id = ChapterId::new(n).unwrap();
        (Selection::Chapter(id), Catalog::chapter_sequence(id))
    }

    #[test]
    fn test_play_selection_starts_from_first_verse() {
        let (mut controller, _sink) = controller();
        let (selection, sequence) = chapter(36);

        let outcome = controller.play_selection(selection, sequence).unwrap();
        assert_eq!(outcome, PlayOutcome::Started);
        assert_eq!(controller.engine().context(), Some(selection));
        assert_eq!(
            controller.engine().current_verse().map(|v| v.local_index),
            Some(1)
        );
    }

    #[test]
    fn test_redundant_play_selection_toggles() {
        let (mut controller, sink) = controller();
        let (selection, sequence) = chapter(1);

        controller.play_selection(selection, sequence.clone()).unwrap();
        sink.emit(SinkEventKind::Ended);
        controller.engine_mut().pump_events();
        let loads = sink.loaded().len();

        let outcome = controller.play_selection(selection, sequence.clone()).unwrap();
        assert_eq!(outcome, PlayOutcome::Toggled(PlaybackStatus::Paused));
        assert_eq!(controller.engine().state().position(), Some(1));

        let outcome = controller.play_selection(selection, sequence).unwrap();
        assert_eq!(outcome, PlayOutcome::Toggled(PlaybackStatus::Playing));
        assert_eq!(controller.engine().state().position(), Some(1));
        assert_eq!(sink.loaded().len(), loads);
    }

    #[test]
    fn test_other_selection_restarts() {
        let (mut controller, _sink) = controller();
        let (first, first_sequence) = chapter(1);
        let juz = Selection::Juz(JuzNumber::new(30).unwrap());
        let juz_sequence = Catalog::juz_sequence(JuzNumber::new(30).unwrap()).unwrap();

        controller.play_selection(first, first_sequence).unwrap();
        let outcome = controller.play_selection(juz, juz_sequence).unwrap();

        assert_eq!(outcome, PlayOutcome::Started);
        assert_eq!(controller.engine().context(), Some(juz));
        assert_eq!(
            controller.engine().current_verse().map(|v| v.global_index),
            Some(5673)
        );
    }

    #[test]
    fn test_play_verse_toggles_current_verse() {
        let (mut controller, _sink) = controller();
        let (selection, sequence) = chapter(2);

        assert_eq!(
            controller.play_verse(selection, sequence.clone(), 262).unwrap(),
            PlayOutcome::Started
        );
        assert_eq!(
            controller.play_verse(selection, sequence.clone(), 262).unwrap(),
            PlayOutcome::Toggled(PlaybackStatus::Paused)
        );
        assert_eq!(
            controller.play_verse(selection, sequence, 263).unwrap(),
            PlayOutcome::Started
        );
        assert_eq!(controller.engine().status(), PlaybackStatus::Playing);
    }

    #[test]
    fn test_play_verse_outside_sequence() {
        let (mut controller, _sink) = controller();
        let (selection, sequence) = chapter(1);

        assert!(matches!(
            controller.play_verse(selection, sequence, 8),
            Err(EngineError::VerseNotInSequence(8))
        ));
        assert_eq!(controller.engine().status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn test_navigate_to_player() {
        let (mut controller, _sink) = controller();
        assert_eq!(controller.navigate_to_player(), None);

        let (selection, sequence) = chapter(2);
        controller.play_verse(selection, sequence, 10).unwrap();
        assert_eq!(controller.navigate_to_player(), Some((selection, 10)));

        controller.stop();
        assert_eq!(controller.navigate_to_player(), None);
    }

    #[test]
    fn test_now_playing_visibility() {
        let (mut controller, _sink) = controller();
        let (selection, sequence) = chapter(18);
        let (other, _) = chapter(19);
        assert!(!controller.now_playing_visible(&View::Home));

        controller.play_selection(selection, sequence).unwrap();
        assert!(controller.now_playing_visible(&View::Home));
        assert!(controller.now_playing_visible(&View::Reading(other)));
        assert!(!controller.now_playing_visible(&View::Reading(selection)));
        assert!(!controller.now_playing_visible(&View::Settings));

        controller.toggle();
        assert!(controller.now_playing_visible(&View::Home));
    }
}
