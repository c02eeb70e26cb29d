//! Engine state and the read-only snapshot handed to observers

use serde::Serialize;
use std::fmt;
use tilawah_core::{Selection, Verse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Stopped => write!(f, "stopped"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
        }
    }
}

/// Which narration of the current verse is targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Source-language recitation
    Primary,
    /// Translation narration
    Secondary,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Primary => write!(f, "recitation"),
            Stage::Secondary => write!(f, "translation"),
        }
    }
}

/// The single mutable state record of the engine
///
/// `position` and `pending_verse` are `None` exactly when stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    status: PlaybackStatus,
    position: Option<usize>,
    stage: Stage,
    pending_verse: Option<u32>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            position: None,
            stage: Stage::Primary,
            pending_verse: None,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn pending_verse(&self) -> Option<u32> {
        self.pending_verse
    }

    pub(crate) fn begin(&mut self, position: usize) {
        self.status = PlaybackStatus::Playing;
        self.position = Some(position);
        self.stage = Stage::Primary;
        self.pending_verse = None;
    }

    pub(crate) fn set_status(&mut self, status: PlaybackStatus) {
        self.status = status;
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn move_to(&mut self, position: usize) {
        self.position = Some(position);
        self.stage = Stage::Primary;
    }

    pub(crate) fn set_pending(&mut self, verse: Option<u32>) {
        self.pending_verse = verse;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the engine for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub stage: Stage,
    pub position: Option<usize>,
    pub current_verse: Option<Verse>,
    pub pending_verse: Option<u32>,
    pub context: Option<Selection>,
    pub sequence_len: usize,
}

impl PlaybackSnapshot {
    pub fn is_active(&self) -> bool {
        self.status != PlaybackStatus::Stopped
    }

    /// True while the current verse is still buffering
    pub fn is_loading(&self) -> bool {
        self.pending_verse.is_some()
    }
}
