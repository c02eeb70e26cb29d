//! Domain types shared by every Tilawah crate
//!
//! - `types`: verse identity, sequences, selections, reading position, bookmarks
//! - `catalog`: static chapter and juz tables used to build verse identity offline
//! - `provider`: the verse data collaborator consumed by the playback engine
//! - `error`: the application error taxonomy

pub mod catalog;
pub mod error;
pub mod provider;
pub mod types;

pub use catalog::Catalog;
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use provider::{CatalogProvider, FallbackProvider, VerseProvider};
pub use types::{
    Bookmark, ChapterId, JuzNumber, LastReadPosition, Selection, Timestamp, Verse, VerseSequence,
};
