//! Verse identity and ordered verse sequences

use crate::catalog::{CHAPTER_COUNT, JUZ_COUNT};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Chapter (surah) number, 1..=114
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ChapterId(u16);

impl ChapterId {
    /// Creates a chapter id, rejecting numbers outside the corpus
    pub fn new(number: u16) -> Result<Self> {
        if (1..=CHAPTER_COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(AppError::InvalidChapter(number))
        }
    }

    /// Returns the 1-based chapter number
    pub fn number(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for ChapterId {
    type Error = AppError;

    fn try_from(number: u16) -> Result<Self> {
        Self::new(number)
    }
}

impl From<ChapterId> for u16 {
    fn from(id: ChapterId) -> Self {
        id.0
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Juz (one of thirty reading portions) number, 1..=30
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct JuzNumber(u8);

impl JuzNumber {
    /// Creates a juz number, rejecting numbers outside 1..=30
    pub fn new(number: u8) -> Result<Self> {
        if (1..=JUZ_COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(AppError::InvalidJuz(number))
        }
    }

    /// Returns the 1-based juz number
    pub fn number(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for JuzNumber {
    type Error = AppError;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number)
    }
}

impl From<JuzNumber> for u8 {
    fn from(juz: JuzNumber) -> Self {
        juz.0
    }
}

impl fmt::Display for JuzNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single verse, identified globally and within its chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Verse {
    /// 1-based index across the whole corpus
    pub global_index: u32,
    /// 1-based position within the chapter
    pub local_index: u16,
    pub chapter_id: ChapterId,
}

impl Verse {
    pub fn new(global_index: u32, local_index: u16, chapter_id: ChapterId) -> Self {
        Self {
            global_index,
            local_index,
            chapter_id,
        }
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter_id, self.local_index)
    }
}

/// Ordered, immutable list of verses loaded for one chapter or juz
///
/// Cloning is cheap: the verses are shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseSequence {
    verses: Arc<[Verse]>,
}

impl VerseSequence {
    /// Creates a sequence, requiring strictly increasing global indices
    pub fn new(verses: Vec<Verse>) -> Result<Self> {
        if let Some(pair) = verses
            .windows(2)
            .find(|pair| pair[1].global_index <= pair[0].global_index)
        {
            return Err(AppError::InvalidSequence {
                reason: format!(
                    "verse {} follows verse {}",
                    pair[1].global_index, pair[0].global_index
                ),
            });
        }

        Ok(Self {
            verses: verses.into(),
        })
    }

    /// Creates an empty sequence
    pub fn empty() -> Self {
        Self {
            verses: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Returns the verse at a 0-based position
    pub fn get(&self, position: usize) -> Option<&Verse> {
        self.verses.get(position)
    }

    pub fn first(&self) -> Option<&Verse> {
        self.verses.first()
    }

    pub fn last(&self) -> Option<&Verse> {
        self.verses.last()
    }

    /// Finds the 0-based position of a verse by global index
    pub fn position_of(&self, global_index: u32) -> Option<usize> {
        self.verses
            .binary_search_by_key(&global_index, |v| v.global_index)
            .ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Verse> {
        self.verses.iter()
    }

    /// Returns true when the sequence has no gaps in global order
    pub fn is_contiguous(&self) -> bool {
        self.verses
            .windows(2)
            .all(|pair| pair[1].global_index == pair[0].global_index + 1)
    }

    /// Returns true if both handles share the same underlying verses
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.verses, &other.verses)
    }
}

impl<'a> IntoIterator for &'a VerseSequence {
    type Item = &'a Verse;
    type IntoIter = std::slice::Iter<'a, Verse>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(n: u16) -> ChapterId {
        ChapterId::new(n).unwrap()
    }

    #[test]
    fn test_chapter_id_bounds() {
        assert!(ChapterId::new(0).is_err());
        assert!(ChapterId::new(1).is_ok());
        assert!(ChapterId::new(114).is_ok());
        assert!(ChapterId::new(115).is_err());
    }

    #[test]
    fn test_juz_number_bounds() {
        assert!(JuzNumber::new(0).is_err());
        assert!(JuzNumber::new(30).is_ok());
        assert!(JuzNumber::new(31).is_err());
    }

    #[test]
    fn test_chapter_id_deserialize_rejects_out_of_range() {
        let ok: std::result::Result<ChapterId, _> = serde_json::from_str("2");
        assert_eq!(ok.unwrap().number(), 2);

        let bad: std::result::Result<ChapterId, _> = serde_json::from_str("200");
        assert!(bad.is_err());
    }

    #[test]
    fn test_verse_display() {
        let verse = Verse::new(8, 1, chapter(2));
        assert_eq!(verse.to_string(), "2:1");
    }

    #[test]
    fn test_sequence_rejects_unordered() {
        let verses = vec![Verse::new(9, 2, chapter(2)), Verse::new(8, 1, chapter(2))];
        assert!(matches!(
            VerseSequence::new(verses),
            Err(AppError::InvalidSequence { .. })
        ));
    }

    #[test]
    fn test_sequence_rejects_duplicates() {
        let verses = vec![Verse::new(8, 1, chapter(2)), Verse::new(8, 1, chapter(2))];
        assert!(VerseSequence::new(verses).is_err());
    }

    #[test]
    fn test_sequence_lookup() {
        let sequence = VerseSequence::new(vec![
            Verse::new(8, 1, chapter(2)),
            Verse::new(9, 2, chapter(2)),
            Verse::new(10, 3, chapter(2)),
        ])
        .unwrap();

        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.position_of(9), Some(1));
        assert_eq!(sequence.position_of(11), None);
        assert_eq!(sequence.get(2).map(|v| v.local_index), Some(3));
        assert!(sequence.get(3).is_none());
        assert!(sequence.is_contiguous());
    }

    #[test]
    fn test_sequence_with_gap_is_not_contiguous() {
        let sequence = VerseSequence::new(vec![
            Verse::new(8, 1, chapter(2)),
            Verse::new(10, 3, chapter(2)),
        ])
        .unwrap();
        assert!(!sequence.is_contiguous());
    }

    #[test]
    fn test_clone_shares_verses() {
        let sequence = VerseSequence::new(vec![Verse::new(1, 1, chapter(1))]).unwrap();
        let clone = sequence.clone();
        assert!(sequence.ptr_eq(&clone));
        assert_eq!(sequence, clone);
    }

    #[test]
    fn test_empty_sequence() {
        let sequence = VerseSequence::empty();
        assert!(sequence.is_empty());
        assert!(sequence.first().is_none());
        assert!(sequence.is_contiguous());
    }
}
