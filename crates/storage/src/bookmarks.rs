//! Bookmarked verses, stored as a JSON array under one key

use crate::error::{StorageError, StorageResult};
use crate::store::KeyValueStore;
use crate::BOOKMARKS_KEY;
use tilawah_core::{Bookmark, Verse};

/// The user's bookmark list
pub struct BookmarkStore<S> {
    store: S,
}

impl<S: KeyValueStore> BookmarkStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All bookmarks in reading order
    ///
    /// An unreadable list is logged and treated as empty.
    pub fn list(&self) -> StorageResult<Vec<Bookmark>> {
        let Some(value) = self.store.get(BOOKMARKS_KEY)? else {
            return Ok(Vec::new());
        };

        let mut bookmarks: Vec<Bookmark> = match serde_json::from_value(value) {
            Ok(bookmarks) => bookmarks,
            Err(e) => {
                log::warn!("Ignoring unreadable bookmark list: {}", e);
                return Ok(Vec::new());
            }
        };
        bookmarks.sort_by_key(|b| b.global_index);
        Ok(bookmarks)
    }

    pub fn contains(&self, verse: &Verse) -> StorageResult<bool> {
        Ok(self.list()?.iter().any(|b| b.is_for(verse)))
    }

    /// Adds or removes the bookmark for a verse
    ///
    /// Returns true if the verse is bookmarked afterwards.
    pub fn toggle(&self, verse: &Verse) -> StorageResult<bool> {
        let mut bookmarks = self.list()?;
        let before = bookmarks.len();
        bookmarks.retain(|b| !b.is_for(verse));

        let added = bookmarks.len() == before;
        if added {
            bookmarks.push(Bookmark::new(verse));
            bookmarks.sort_by_key(|b| b.global_index);
            log::info!("Bookmarked verse {}", verse);
        } else {
            log::info!("Removed bookmark for verse {}", verse);
        }

        self.save(&bookmarks)?;
        Ok(added)
    }

    /// Removes a bookmark by id. Returns true if one was removed.
    pub fn remove(&self, id: &str) -> StorageResult<bool> {
        let mut bookmarks = self.list()?;
        let before = bookmarks.len();
        bookmarks.retain(|b| b.id != id);

        if bookmarks.len() == before {
            return Ok(false);
        }
        self.save(&bookmarks)?;
        Ok(true)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(BOOKMARKS_KEY)
    }

    fn save(&self, bookmarks: &[Bookmark]) -> StorageResult<()> {
        let value = serde_json::to_value(bookmarks).map_err(|e| StorageError::Encode {
            key: BOOKMARKS_KEY.to_string(),
            source: e,
        })?;
        self.store.set(BOOKMARKS_KEY, value)
    }
}
