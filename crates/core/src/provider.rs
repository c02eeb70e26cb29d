//! Verse data providers
//!
//! The playback engine only consumes an already-loaded `VerseSequence`.
//! Providers are the collaborators that produce one for a selection.

use crate::catalog::Catalog;
use crate::error::{AppError, Result};
use crate::types::{Selection, VerseSequence};

/// Produces the ordered verses for a chapter or juz
pub trait VerseProvider {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Loads the sequence for a selection
    fn load(&self, selection: &Selection) -> Result<VerseSequence>;
}

/// Builds verse identity from the static catalog
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogProvider;

impl VerseProvider for CatalogProvider {
    fn name(&self) -> &str {
        "catalog"
    }

    fn load(&self, selection: &Selection) -> Result<VerseSequence> {
        match selection {
            Selection::Chapter(chapter) => Ok(Catalog::chapter_sequence(*chapter)),
            Selection::Juz(juz) => Catalog::juz_sequence(*juz),
        }
    }
}

/// Tries a primary provider, then a fallback
///
/// An empty sequence counts as a failure. The caller never retries; a
/// total failure simply yields no sequence.
pub struct FallbackProvider<P, F> {
    primary: P,
    fallback: F,
}

impl<P: VerseProvider, F: VerseProvider> FallbackProvider<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Loads a sequence, returning `None` when every provider failed
    pub fn load_or_none(&self, selection: &Selection) -> Option<VerseSequence> {
        self.load(selection).ok()
    }

    fn attempt(provider: &dyn VerseProvider, selection: &Selection) -> Result<VerseSequence> {
        let sequence = provider.load(selection)?;
        if sequence.is_empty() {
            return Err(AppError::provider(provider.name(), "returned no verses"));
        }
        Ok(sequence)
    }
}

impl<P: VerseProvider, F: VerseProvider> VerseProvider for FallbackProvider<P, F> {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn load(&self, selection: &Selection) -> Result<VerseSequence> {
        match Self::attempt(&self.primary, selection) {
            Ok(sequence) => return Ok(sequence),
            Err(e) => log::warn!(
                "Primary verse provider '{}' failed for {}: {}, trying '{}'",
                self.primary.name(),
                selection,
                e,
                self.fallback.name()
            ),
        }

        match Self::attempt(&self.fallback, selection) {
            Ok(sequence) => Ok(sequence),
            Err(e) => {
                log::error!("All verse providers failed for {}: {}", selection, e);
                Err(AppError::NoVersesAvailable {
                    selection: selection.to_string(),
                })
            }
        }
    }
}
