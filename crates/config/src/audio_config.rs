//! Recitation audio configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Sentinel secondary narrator that disables translation narration
pub const NO_SECONDARY_NARRATOR: &str = "none";

/// Known source-language reciters
pub const PRIMARY_NARRATORS: &[&str] = &["ar.alafasy", "ar.hudhaify", "ar.mahermuaiqly"];

/// Known translation narrators, including the "off" sentinel
pub const SECONDARY_NARRATORS: &[&str] = &[NO_SECONDARY_NARRATOR, "en.walk", "ur.khan"];

/// Recitation audio preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Reciter for the source-language stage
    pub primary_narrator: String,

    /// Narrator for the translation stage, or "none"
    pub secondary_narrator: String,

    /// Playback rate (0.5 - 2.0)
    pub playback_rate: f32,

    /// Audio address template with `{narrator}` and `{verse}` placeholders
    pub resource_template: String,

    /// How many upcoming verses to warm ahead of the current one
    pub prefetch_depth: usize,

    /// Skip a verse whose audio has not become ready after this many
    /// seconds; 0 waits forever
    pub stall_timeout_secs: u64,
}

impl AudioConfig {
    /// Returns the translation narrator, or `None` when disabled
    pub fn secondary(&self) -> Option<&str> {
        let narrator = self.secondary_narrator.trim();
        if narrator.is_empty() || narrator == NO_SECONDARY_NARRATOR {
            None
        } else {
            Some(narrator)
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            primary_narrator: "ar.alafasy".to_string(),
            secondary_narrator: "ur.khan".to_string(),
            playback_rate: 1.0,
            resource_template: "https://cdn.alquran.cloud/media/audio/ayah/{narrator}/{verse}"
                .to_string(),
            prefetch_depth: 3,
            stall_timeout_secs: 0,
        }
    }
}

impl ConfigSection for AudioConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::one_of(
                &self.primary_narrator.as_str(),
                PRIMARY_NARRATORS,
                "audio.primary_narrator",
            ),
            Validator::one_of(
                &self.secondary_narrator.as_str(),
                SECONDARY_NARRATORS,
                "audio.secondary_narrator",
            ),
            Validator::in_range(self.playback_rate, 0.5, 2.0, "audio.playback_rate"),
            Validator::contains_all(
                &self.resource_template,
                &["{narrator}", "{verse}"],
                "audio.resource_template",
            ),
            Validator::in_range(self.prefetch_depth, 0, 10, "audio.prefetch_depth"),
            Validator::in_range(self.stall_timeout_secs, 0, 600, "audio.stall_timeout_secs"),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.primary_narrator = other.primary_narrator;
        self.secondary_narrator = other.secondary_narrator;
        self.playback_rate = other.playback_rate;
        self.resource_template = other.resource_template;
        self.prefetch_depth = other.prefetch_depth;
        self.stall_timeout_secs = other.stall_timeout_secs;
    }

    fn section_name(&self) -> &'static str {
        "audio"
    }
}
