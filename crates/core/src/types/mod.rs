//! Domain types for Tilawah
//!
//! This module contains the domain models organized by responsibility:
//! - `verse`: verse identity and ordered verse sequences
//! - `selection`: the chapter or juz a sequence was loaded for
//! - `position`: the persisted last-read position
//! - `bookmark`: user bookmarks
//! - `common`: shared utilities

mod bookmark;
mod common;
mod position;
mod selection;
mod verse;

pub use bookmark::Bookmark;
pub use common::Timestamp;
pub use position::LastReadPosition;
pub use selection::Selection;
pub use verse::{ChapterId, JuzNumber, Verse, VerseSequence};
