//! Narrator selection read by the engine at every resolution

use std::sync::{Arc, RwLock};

/// Secondary narrator id that disables the translation stage
pub const NO_NARRATOR: &str = "none";

/// Which narrators to use and how fast to play them
#[derive(Debug, Clone, PartialEq)]
pub struct NarratorSelection {
    pub primary: String,
    secondary: Option<String>,
    pub rate: f32,
}

impl NarratorSelection {
    /// Creates a selection; a secondary of `"none"` or blank disables it
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        let secondary = secondary.into();
        let secondary = match secondary.trim() {
            "" | NO_NARRATOR => None,
            id => Some(id.to_string()),
        };

        Self {
            primary: primary.into(),
            secondary,
            rate: 1.0,
        }
    }

    /// Primary narration only
    pub fn primary_only(primary: impl Into<String>) -> Self {
        Self::new(primary, NO_NARRATOR)
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }
}

/// Supplies the narrator selection in effect right now
///
/// The engine asks again for every (verse, stage) it resolves, so changes
/// reach the next resolution without touching audio already playing.
pub trait NarratorSource {
    fn current(&self) -> NarratorSelection;
}

impl NarratorSource for NarratorSelection {
    fn current(&self) -> NarratorSelection {
        self.clone()
    }
}

/// A selection that can be changed from outside while the engine runs
#[derive(Debug, Clone)]
pub struct SharedNarrators {
    inner: Arc<RwLock<NarratorSelection>>,
}

impl SharedNarrators {
    pub fn new(selection: NarratorSelection) -> Self {
        Self {
            inner: Arc::new(RwLock::new(selection)),
        }
    }

    pub fn set(&self, selection: NarratorSelection) {
        match self.inner.write() {
            Ok(mut guard) => *guard = selection,
            Err(poisoned) => *poisoned.into_inner() = selection,
        }
    }
}

impl NarratorSource for SharedNarrators {
    fn current(&self) -> NarratorSelection {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
