//! Best-effort warming of upcoming audio resources

use crate::locator::{ResourceAddress, ResourceLocator};
use crate::narrator::NarratorSelection;
use crate::state::Stage;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tilawah_core::VerseSequence;

/// Starts a background load of a resource and forgets about it
///
/// Implementations must not block and must not retry.
pub trait ResourceWarmer {
    fn warm(&self, address: &ResourceAddress);
}

impl<W: ResourceWarmer + ?Sized> ResourceWarmer for Arc<W> {
    fn warm(&self, address: &ResourceAddress) {
        (**self).warm(address)
    }
}

impl<W: ResourceWarmer + ?Sized> ResourceWarmer for Box<W> {
    fn warm(&self, address: &ResourceAddress) {
        (**self).warm(address)
    }
}

/// Warmer that does nothing, for offline sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWarmer;

impl ResourceWarmer for NoopWarmer {
    fn warm(&self, _address: &ResourceAddress) {}
}

/// Deduplicates warm requests within one playback session
pub struct Prefetcher<W> {
    warmer: W,
    warmed: HashSet<ResourceAddress>,
    order: VecDeque<ResourceAddress>,
    capacity: usize,
}

impl<W: ResourceWarmer> Prefetcher<W> {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(warmer: W) -> Self {
        Self::with_capacity(warmer, Self::DEFAULT_CAPACITY)
    }

    /// Creates a prefetcher remembering at most `capacity` addresses
    pub fn with_capacity(warmer: W, capacity: usize) -> Self {
        Self {
            warmer,
            warmed: HashSet::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Warms every address not already warmed this session
    ///
    /// Returns how many warm requests were issued.
    pub fn schedule<I>(&mut self, addresses: I) -> usize
    where
        I: IntoIterator<Item = ResourceAddress>,
    {
        let mut issued = 0;
        for address in addresses {
            if self.warmed.contains(&address) {
                continue;
            }

            self.warmer.warm(&address);
            self.remember(address);
            issued += 1;
        }

        if issued > 0 {
            log::debug!("Prefetching {} audio resources", issued);
        }
        issued
    }

    fn remember(&mut self, address: ResourceAddress) {
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.warmed.remove(&oldest);
            }
        }
        self.warmed.insert(address.clone());
        self.order.push_back(address);
    }

    /// Forgets the session's warmed set
    pub fn clear(&mut self) {
        self.warmed.clear();
        self.order.clear();
    }

    pub fn is_warmed(&self, address: &ResourceAddress) -> bool {
        self.warmed.contains(address)
    }

    pub fn warmed_count(&self) -> usize {
        self.warmed.len()
    }

    pub fn warmer(&self) -> &W {
        &self.warmer
    }
}

/// Addresses worth warming while `position` plays in `stage`
///
/// The translation of the current verse when it is still in recitation,
/// then both narrations of up to `depth` following verses.
pub fn lookahead(
    locator: &ResourceLocator,
    sequence: &VerseSequence,
    position: usize,
    stage: Stage,
    narrators: &NarratorSelection,
    depth: usize,
) -> Vec<ResourceAddress> {
    let mut addresses = Vec::with_capacity(depth * 2 + 1);

    if let (Stage::Primary, Some(secondary), Some(current)) =
        (stage, narrators.secondary(), sequence.get(position))
    {
        addresses.push(locator.locate(current.global_index, secondary));
    }

    for verse in sequence.iter().skip(position + 1).take(depth) {
        addresses.push(locator.locate(verse.global_index, &narrators.primary));
        if let Some(secondary) = narrators.secondary() {
            addresses.push(locator.locate(verse.global_index, secondary));
        }
    }

    addresses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingWarmer;
    use tilawah_core::{Catalog, ChapterId};

    fn address(s: &str) -> ResourceAddress {
        ResourceAddress::new(s)
    }

    fn al_fatiha() -> VerseSequence {
        Catalog::chapter_sequence(ChapterId::new(1).unwrap())
    }

    #[test]
    fn test_schedule_dedups_within_session() {
        let warmer = RecordingWarmer::new();
        let mut prefetcher = Prefetcher::new(warmer.clone());

        assert_eq!(prefetcher.schedule(vec![address("a"), address("b")]), 2);
        assert_eq!(prefetcher.schedule(vec![address("b"), address("c")]), 1);
        assert_eq!(warmer.addresses(), vec![address("a"), address("b"), address("c")]);
    }

    #[test]
    fn test_clear_starts_new_session() {
        let warmer = RecordingWarmer::new();
        let mut prefetcher = Prefetcher::new(warmer.clone());

        prefetcher.schedule(vec![address("a")]);
        prefetcher.clear();
        assert!(!prefetcher.is_warmed(&address("a")));
        assert_eq!(prefetcher.schedule(vec![address("a")]), 1);
        assert_eq!(warmer.addresses().len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut prefetcher = Prefetcher::with_capacity(NoopWarmer, 2);
        prefetcher.schedule(vec![address("a"), address("b"), address("c")]);

        assert_eq!(prefetcher.warmed_count(), 2);
        assert!(!prefetcher.is_warmed(&address("a")));
        assert!(prefetcher.is_warmed(&address("c")));
    }

    #[test]
    fn test_lookahead_with_secondary() {
        let locator = ResourceLocator::default();
        let narrators = NarratorSelection::new("ar.alafasy", "ur.khan");

        let addresses = lookahead(&locator, &al_fatiha(), 0, Stage::Primary, &narrators, 3);
        let expected = vec![
            locator.locate(1, "ur.khan"),
            locator.locate(2, "ar.alafasy"),
            locator.locate(2, "ur.khan"),
            locator.locate(3, "ar.alafasy"),
            locator.locate(3, "ur.khan"),
            locator.locate(4, "ar.alafasy"),
            locator.locate(4, "ur.khan"),
        ];
        assert_eq!(addresses, expected);
    }

    #[test]
    fn test_lookahead_in_secondary_skips_current() {
        let locator = ResourceLocator::default();
        let narrators = NarratorSelection::new("ar.alafasy", "ur.khan");

        let addresses = lookahead(&locator, &al_fatiha(), 0, Stage::Secondary, &narrators, 1);
        assert_eq!(
            addresses,
            vec![locator.locate(2, "ar.alafasy"), locator.locate(2, "ur.khan")]
        );
    }

    #[test]
    fn test_lookahead_stops_at_sequence_end() {
        let locator = ResourceLocator::default();
        let narrators = NarratorSelection::primary_only("ar.alafasy");

        let addresses = lookahead(&locator, &al_fatiha(), 5, Stage::Primary, &narrators, 3);
        assert_eq!(addresses, vec![locator.locate(7, "ar.alafasy")]);

        assert!(lookahead(&locator, &al_fatiha(), 6, Stage::Primary, &narrators, 3).is_empty());
    }
}
