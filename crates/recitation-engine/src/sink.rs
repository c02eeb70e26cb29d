//! Contract between the engine and the audio output

use crate::locator::ResourceAddress;
use crossbeam_channel::Sender;
use std::fmt;

/// Identifies one resolution
///
/// Every (verse, stage) the engine targets gets a fresh id, so events
/// from an earlier load can be told apart even when the address repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(u64);

impl LoadId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEventKind {
    /// Enough audio is buffered to play through
    CanPlay,
    /// The audio reached its natural end
    Ended,
    /// Loading or playback failed
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkEvent {
    pub load: LoadId,
    pub kind: SinkEventKind,
}

impl SinkEvent {
    pub fn new(load: LoadId, kind: SinkEventKind) -> Self {
        Self { load, kind }
    }
}

pub type SinkEventSender = Sender<SinkEvent>;

/// A single reusable audio output
///
/// The engine swaps the loaded address on the same instance for every
/// verse. Events are reported through the sender given to `attach`,
/// tagged with the `LoadId` of the load they belong to.
pub trait AudioSink {
    /// Starts reporting events to `events`
    fn attach(&mut self, events: SinkEventSender);

    /// Stops reporting events; nothing may be sent after this returns
    fn detach(&mut self);

    /// Replaces the current resource
    fn load(&mut self, load: LoadId, address: &ResourceAddress);

    fn play(&mut self);

    /// Pauses without releasing the buffered resource
    fn pause(&mut self);

    /// Stops output and releases the current resource
    fn halt(&mut self);

    fn set_rate(&mut self, rate: f32);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn attach(&mut self, events: SinkEventSender) {
        (**self).attach(events)
    }

    fn detach(&mut self) {
        (**self).detach()
    }

    fn load(&mut self, load: LoadId, address: &ResourceAddress) {
        (**self).load(load, address)
    }

    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn halt(&mut self) {
        (**self).halt()
    }

    fn set_rate(&mut self, rate: f32) {
        (**self).set_rate(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_ids_increase() {
        let first = LoadId::new(1);
        assert!(first.next() > first);
        assert_eq!(first.next().value(), 2);
        assert_eq!(first.to_string(), "#1");
    }
}
