//! Reading preferences section

use crate::validation::{ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language of the translation shown next to the source text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranslationLanguage {
    English,
    Urdu,
}

impl TranslationLanguage {
    /// Translation narrator that reads this language aloud
    pub fn narrator(&self) -> &'static str {
        match self {
            TranslationLanguage::English => "en.walk",
            TranslationLanguage::Urdu => "ur.khan",
        }
    }
}

impl std::fmt::Display for TranslationLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationLanguage::English => write!(f, "english"),
            TranslationLanguage::Urdu => write!(f, "urdu"),
        }
    }
}

impl FromStr for TranslationLanguage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(TranslationLanguage::English),
            "urdu" | "ur" => Ok(TranslationLanguage::Urdu),
            _ => Err(ValidationError::with_value(
                "reading.translation_language",
                "must be one of: english, urdu",
                s,
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReadingConfig {
    pub translation_language: TranslationLanguage,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            translation_language: TranslationLanguage::Urdu,
        }
    }
}

impl ConfigSection for ReadingConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        // Every variant is usable
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        self.translation_language = other.translation_language;
    }

    fn section_name(&self) -> &'static str {
        "reading"
    }
}
