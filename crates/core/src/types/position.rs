//! Persisted last-read position

use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::ChapterId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The verse the user last heard, stored for "continue reading"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastReadPosition {
    pub chapter_id: ChapterId,
    pub local_index: u16,
}

impl LastReadPosition {
    pub fn new(chapter_id: ChapterId, local_index: u16) -> Self {
        Self {
            chapter_id,
            local_index,
        }
    }

    /// Global verse index to scroll to when resuming
    pub fn resume_global_index(&self) -> Result<u32> {
        Catalog::global_index(self.chapter_id, self.local_index)
    }
}

impl fmt::Display for LastReadPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter_id, self.local_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_global_index() {
        let position = LastReadPosition::new(ChapterId::new(2).unwrap(), 1);
        assert_eq!(position.resume_global_index().unwrap(), 8);
    }

    #[test]
    fn test_resume_rejects_verse_past_chapter_end() {
        let position = LastReadPosition::new(ChapterId::new(1).unwrap(), 8);
        assert!(position.resume_global_index().is_err());
    }

    #[test]
    fn test_canonical_json_shape() {
        let position = LastReadPosition::new(ChapterId::new(36).unwrap(), 12);
        let json = serde_json::to_value(position).unwrap();
        assert_eq!(json, serde_json::json!({"chapterId": 36, "localIndex": 12}));
    }
}
