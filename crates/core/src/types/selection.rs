//! The originating unit a verse sequence was loaded for

use crate::types::{ChapterId, JuzNumber};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chapter or a juz, as picked by the user
///
/// Doubles as the playback context identity: the UI uses it to navigate
/// back to the container that is currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "number", rename_all = "lowercase")]
pub enum Selection {
    Chapter(ChapterId),
    Juz(JuzNumber),
}

impl Selection {
    /// Returns the chapter if this selection is a chapter
    pub fn chapter(&self) -> Option<ChapterId> {
        match self {
            Self::Chapter(id) => Some(*id),
            Self::Juz(_) => None,
        }
    }

    /// Returns the juz if this selection is a juz
    pub fn juz(&self) -> Option<JuzNumber> {
        match self {
            Self::Juz(juz) => Some(*juz),
            Self::Chapter(_) => None,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chapter(id) => write!(f, "chapter {}", id),
            Self::Juz(juz) => write!(f, "juz {}", juz),
        }
    }
}
