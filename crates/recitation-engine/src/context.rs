//! Which chapter or juz the active playback came from
//!
//! Descriptive only: advance logic never reads it. Callers use it to decide
//! whether "play" on a container should toggle instead of restart, and
//! where to navigate back to.

use tilawah_core::Selection;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackContextHolder {
    current: Option<Selection>,
}

impl PlaybackContextHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, selection: Selection) {
        self.current = Some(selection);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<Selection> {
        self.current
    }

    /// True if playback currently belongs to `selection`
    pub fn is(&self, selection: &Selection) -> bool {
        self.current.as_ref() == Some(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilawah_core::{ChapterId, JuzNumber};

    #[test]
    fn test_set_get_clear() {
        let mut holder = PlaybackContextHolder::new();
        let chapter = Selection::Chapter(ChapterId::new(18).unwrap());

        assert_eq!(holder.get(), None);
        holder.set(chapter);
        assert!(holder.is(&chapter));
        assert!(!holder.is(&Selection::Juz(JuzNumber::new(15).unwrap())));

        holder.clear();
        assert!(!holder.is(&chapter));
    }
}
