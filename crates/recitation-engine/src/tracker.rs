//! Persisted "continue reading" position
//!
//! Failures to persist never interrupt playback; they are logged and the
//! previous value stays in place.

use serde::Deserialize;
use serde_json::Value;
use tilawah_core::{Catalog, ChapterId, LastReadPosition};
use tilawah_storage::{KeyValueStore, StorageResult, LAST_READ_KEY, LEGACY_LAST_READ_KEY};

/// Every shape the position has been stored in
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPosition {
    Canonical {
        #[serde(rename = "chapterId")]
        chapter_id: u16,
        #[serde(rename = "localIndex")]
        local_index: u16,
    },
    /// Whole chapter object kept next to the verse number
    WithChapter {
        surah: StoredChapter,
        #[serde(rename = "verseNumberInSurah")]
        verse: u16,
    },
    WithChapterNumber {
        #[serde(rename = "surahNumber")]
        chapter: u16,
        #[serde(rename = "verseNumberInSurah")]
        verse: u16,
    },
}

#[derive(Deserialize)]
struct StoredChapter {
    number: u16,
}

impl StoredPosition {
    fn parts(&self) -> (u16, u16) {
        match self {
            StoredPosition::Canonical {
                chapter_id,
                local_index,
            } => (*chapter_id, *local_index),
            StoredPosition::WithChapter { surah, verse } => (surah.number, *verse),
            StoredPosition::WithChapterNumber { chapter, verse } => (*chapter, *verse),
        }
    }
}

/// Normalizes a stored value, or `None` if it names no real verse
fn normalize(value: Value) -> Option<LastReadPosition> {
    let stored: StoredPosition = match serde_json::from_value(value) {
        Ok(stored) => stored,
        Err(e) => {
            log::debug!("Unrecognised last-read record: {}", e);
            return None;
        }
    };

    let (chapter, local) = stored.parts();
    let chapter = ChapterId::new(chapter).ok()?;
    Catalog::global_index(chapter, local).ok()?;
    Some(LastReadPosition::new(chapter, local))
}

pub struct PositionTracker<S> {
    store: S,
}

impl<S: KeyValueStore> PositionTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrites the last-read position
    pub fn record(&self, chapter_id: ChapterId, local_index: u16) {
        let position = LastReadPosition::new(chapter_id, local_index);
        let value = match serde_json::to_value(position) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Could not encode last-read position {}: {}", position, e);
                return;
            }
        };

        if let Err(e) = self.store.set(LAST_READ_KEY, value) {
            log::warn!("Could not save last-read position {}: {}", position, e);
        }
    }

    /// Reads the last-read position in canonical form
    ///
    /// Falls back to the key used by earlier releases. Anything that does
    /// not resolve to a real verse reads as no position.
    pub fn read(&self) -> Option<LastReadPosition> {
        for key in [LAST_READ_KEY, LEGACY_LAST_READ_KEY] {
            match self.store.get(key) {
                Ok(Some(Value::Null)) | Ok(None) => continue,
                Ok(Some(value)) => return normalize(value),
                Err(e) => {
                    log::warn!("Could not read last-read position: {}", e);
                    return None;
                }
            }
        }
        None
    }

    /// Forgets the position, including any legacy copy
    pub fn reset(&self) -> StorageResult<()> {
        self.store.remove(LAST_READ_KEY)?;
        self.store.remove(LEGACY_LAST_READ_KEY)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
