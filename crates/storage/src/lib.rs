//! Tilawah Storage Layer
//!
//! A small persistent key-value store holding JSON values, plus the
//! bookmark list built on top of it. Keys mirror the ones the reading
//! app has always used, so existing data keeps loading.

pub mod bookmarks;
pub mod error;
pub mod store;

pub use bookmarks::BookmarkStore;
pub use error::{StorageError, StorageResult};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

/// Key holding the last-read position
pub const LAST_READ_KEY: &str = "lastRead";

/// Key the last-read position was kept under by earlier releases
pub const LEGACY_LAST_READ_KEY: &str = "quranAppLastRead";

/// Key holding the bookmark list
pub const BOOKMARKS_KEY: &str = "bookmarks";
