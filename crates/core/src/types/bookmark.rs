//! Bookmark domain model

use crate::types::{ChapterId, Timestamp, Verse};
use serde::{Deserialize, Serialize};

/// A bookmarked verse
///
/// The id is `"<chapter>-<verse>"`, so toggling the same verse twice
/// finds the existing bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub chapter_id: ChapterId,
    pub local_index: u16,
    pub global_index: u32,
    pub created_at: Timestamp,
}

impl Bookmark {
    /// Creates a bookmark for a verse
    pub fn new(verse: &Verse) -> Self {
        Self {
            id: Self::id_for(verse),
            chapter_id: verse.chapter_id,
            local_index: verse.local_index,
            global_index: verse.global_index,
            created_at: Timestamp::now(),
        }
    }

    /// Returns the bookmark id a verse maps to
    pub fn id_for(verse: &Verse) -> String {
        format!("{}-{}", verse.chapter_id, verse.local_index)
    }

    /// Returns true if this bookmark points at the given verse
    pub fn is_for(&self, verse: &Verse) -> bool {
        self.id == Self::id_for(verse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse() -> Verse {
        Verse::new(262, 255, ChapterId::new(2).unwrap())
    }

    #[test]
    fn test_bookmark_id_format() {
        let bookmark = Bookmark::new(&verse());
        assert_eq!(bookmark.id, "2-255");
        assert_eq!(bookmark.global_index, 262);
    }

    #[test]
    fn test_bookmark_is_for() {
        let bookmark = Bookmark::new(&verse());
        assert!(bookmark.is_for(&verse()));
        assert!(!bookmark.is_for(&Verse::new(263, 256, ChapterId::new(2).unwrap())));
    }
}
