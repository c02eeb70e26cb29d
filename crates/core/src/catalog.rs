//! Static chapter and juz tables
//!
//! Verse identity (global index, chapter, position within chapter) is fully
//! determined by the per-chapter verse counts, so sequences can be built
//! without any network access.

use crate::error::{AppError, Result};
use crate::types::{ChapterId, JuzNumber, Verse, VerseSequence};

/// Number of chapters in the corpus
pub const CHAPTER_COUNT: u16 = 114;

/// Number of juz portions
pub const JUZ_COUNT: u8 = 30;

/// Total number of verses in the corpus
pub const VERSE_COUNT: u32 = 6236;

const VERSES_PER_CHAPTER: [u16; CHAPTER_COUNT as usize] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99, 128, 111, 110, 98, 135,
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34, 30, 73, 54, 45, 83, 182, 88, 75, 85, 54, 53,
    89, 59, 37, 35, 38, 29, 18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11, 11, 18, 12,
    12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19, 36, 25, 22, 17, 19, 26,
    30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11, 11, 8, 3, 9, 5, 4, 7, 3, 6, 3, 5, 4, 5, 6,
];

/// (chapter, verse) where each juz begins
const JUZ_STARTS: [(u16, u16); JUZ_COUNT as usize] = [
    (1, 1),
    (2, 142),
    (2, 253),
    (3, 93),
    (4, 24),
    (4, 148),
    (5, 82),
    (6, 111),
    (7, 88),
    (8, 41),
    (9, 93),
    (11, 6),
    (12, 53),
    (15, 1),
    (17, 1),
    (18, 75),
    (21, 1),
    (23, 1),
    (25, 21),
    (27, 56),
    (29, 46),
    (33, 31),
    (36, 28),
    (39, 32),
    (41, 47),
    (46, 1),
    (51, 31),
    (58, 1),
    (67, 1),
    (78, 1),
];

/// Global index of the first verse of each chapter
const CHAPTER_STARTS: [u32; CHAPTER_COUNT as usize] = chapter_starts();

const fn chapter_starts() -> [u32; CHAPTER_COUNT as usize] {
    let mut starts = [0u32; CHAPTER_COUNT as usize];
    let mut next = 1u32;
    let mut i = 0;
    while i < CHAPTER_COUNT as usize {
        starts[i] = next;
        next += VERSES_PER_CHAPTER[i] as u32;
        i += 1;
    }
    starts
}

/// Lookups over the static tables
pub struct Catalog;

impl Catalog {
    /// Number of verses in a chapter
    pub fn chapter_verse_count(chapter: ChapterId) -> u16 {
        VERSES_PER_CHAPTER[chapter.number() as usize - 1]
    }

    /// Global index of the first verse of a chapter
    pub fn chapter_start_global(chapter: ChapterId) -> u32 {
        CHAPTER_STARTS[chapter.number() as usize - 1]
    }

    /// Global index of a verse given its chapter and position in that chapter
    pub fn global_index(chapter: ChapterId, local: u16) -> Result<u32> {
        if local == 0 || local > Self::chapter_verse_count(chapter) {
            return Err(AppError::InvalidVerse {
                chapter: chapter.number(),
                local,
            });
        }
        Ok(Self::chapter_start_global(chapter) + local as u32 - 1)
    }

    /// Resolves a global index back to a full verse identity
    pub fn locate_global(global_index: u32) -> Result<Verse> {
        if global_index == 0 || global_index > VERSE_COUNT {
            return Err(AppError::InvalidGlobalIndex(global_index));
        }

        // Index of the last chapter starting at or before the verse
        let idx = CHAPTER_STARTS.partition_point(|&start| start <= global_index) - 1;
        let chapter = ChapterId::new(idx as u16 + 1)?;
        let local = (global_index - CHAPTER_STARTS[idx] + 1) as u16;
        Ok(Verse::new(global_index, local, chapter))
    }

    /// Global index where a juz begins
    pub fn juz_start_global(juz: JuzNumber) -> u32 {
        let (chapter, local) = JUZ_STARTS[juz.number() as usize - 1];
        CHAPTER_STARTS[chapter as usize - 1] + local as u32 - 1
    }

    /// Every verse of a chapter, in order
    pub fn chapter_sequence(chapter: ChapterId) -> VerseSequence {
        let start = Self::chapter_start_global(chapter);
        let verses = (1..=Self::chapter_verse_count(chapter))
            .map(|local| Verse::new(start + local as u32 - 1, local, chapter))
            .collect();
        Self::build(verses)
    }

    /// Every verse of a juz, which may span several chapters
    pub fn juz_sequence(juz: JuzNumber) -> Result<VerseSequence> {
        let first = Self::juz_start_global(juz);
        let last = match JuzNumber::new(juz.number() + 1) {
            Ok(next) => Self::juz_start_global(next) - 1,
            Err(_) => VERSE_COUNT,
        };

        let verses = (first..=last)
            .map(Self::locate_global)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::build(verses))
    }

    fn build(verses: Vec<Verse>) -> VerseSequence {
        // Catalog output is ordered by construction
        VerseSequence::new(verses).unwrap_or_else(|_| VerseSequence::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(n: u16) -> ChapterId {
        ChapterId::new(n).unwrap()
    }

    fn juz(n: u8) -> JuzNumber {
        JuzNumber::new(n).unwrap()
    }

    #[test]
    fn test_total_verse_count() {
        let total: u32 = VERSES_PER_CHAPTER.iter().map(|&n| n as u32).sum();
        assert_eq!(total, VERSE_COUNT);
    }

    #[test]
    fn test_chapter_starts() {
        assert_eq!(Catalog::chapter_start_global(chapter(1)), 1);
        assert_eq!(Catalog::chapter_start_global(chapter(2)), 8);
        assert_eq!(Catalog::chapter_start_global(chapter(114)), 6231);
    }

    #[test]
    fn test_global_index() {
        assert_eq!(Catalog::global_index(chapter(2), 142).unwrap(), 149);
        assert_eq!(Catalog::global_index(chapter(114), 6).unwrap(), 6236);
        assert!(Catalog::global_index(chapter(1), 0).is_err());
        assert!(Catalog::global_index(chapter(1), 8).is_err());
    }

    #[test]
    fn test_locate_global() {
        let verse = Catalog::locate_global(8).unwrap();
        assert_eq!(verse.chapter_id.number(), 2);
        assert_eq!(verse.local_index, 1);

        let last = Catalog::locate_global(VERSE_COUNT).unwrap();
        assert_eq!(last.chapter_id.number(), 114);
        assert_eq!(last.local_index, 6);

        assert!(Catalog::locate_global(0).is_err());
        assert!(Catalog::locate_global(VERSE_COUNT + 1).is_err());
    }

    #[test]
    fn test_locate_global_is_inverse_of_global_index() {
        for global in [1, 7, 8, 293, 5673, 6236] {
            let verse = Catalog::locate_global(global).unwrap();
            assert_eq!(
                Catalog::global_index(verse.chapter_id, verse.local_index).unwrap(),
                global
            );
        }
    }

    #[test]
    fn test_chapter_sequence() {
        let sequence = Catalog::chapter_sequence(chapter(1));
        assert_eq!(sequence.len(), 7);
        assert_eq!(sequence.first().map(|v| v.global_index), Some(1));
        assert_eq!(sequence.last().map(|v| v.global_index), Some(7));
        assert!(sequence.is_contiguous());
    }

    #[test]
    fn test_juz_sequence_spans_chapters() {
        let sequence = Catalog::juz_sequence(juz(30)).unwrap();
        assert_eq!(sequence.first().map(|v| v.global_index), Some(5673));
        assert_eq!(sequence.last().map(|v| v.global_index), Some(VERSE_COUNT));
        assert_eq!(sequence.first().map(|v| v.chapter_id.number()), Some(78));
        assert_eq!(sequence.last().map(|v| v.chapter_id.number()), Some(114));
        assert!(sequence.is_contiguous());
    }

    #[test]
    fn test_juz_sequence_ends_before_next_juz() {
        let sequence = Catalog::juz_sequence(juz(1)).unwrap();
        assert_eq!(sequence.last().map(|v| v.global_index), Some(148));
        assert_eq!(sequence.last().map(|v| v.local_index), Some(141));
    }
}
