//! In-memory collaborators for driving the engine without audio output
//!
//! Both types are cheap to clone and share their recordings, so a test
//! can hand one clone to the engine and inspect another.

use crate::locator::ResourceAddress;
use crate::prefetch::ResourceWarmer;
use crate::sink::{AudioSink, LoadId, SinkEvent, SinkEventKind, SinkEventSender};
use std::sync::{Arc, Mutex, MutexGuard};

/// A call the engine made on a sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Attach,
    Detach,
    Load(LoadId, ResourceAddress),
    Play,
    Pause,
    Halt,
    SetRate(f32),
}

#[derive(Debug, Default)]
struct SinkInner {
    calls: Vec<SinkCall>,
    events: Option<SinkEventSender>,
    current: Option<(LoadId, ResourceAddress)>,
}

/// Sink that records calls and lets the caller fire events
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<SinkInner>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SinkInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.lock().calls.clone()
    }

    /// Addresses loaded so far, in order
    pub fn loaded(&self) -> Vec<ResourceAddress> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Load(_, address) => Some(address.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn current(&self) -> Option<(LoadId, ResourceAddress)> {
        self.lock().current.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.lock().events.is_some()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Fires an event for the current load
    ///
    /// Returns false when detached or nothing is loaded.
    pub fn emit(&self, kind: SinkEventKind) -> bool {
        let inner = self.lock();
        match (&inner.events, &inner.current) {
            (Some(events), Some((load, _))) => {
                events.send(SinkEvent::new(*load, kind)).is_ok()
            }
            _ => false,
        }
    }

    /// The sender handed to the sink on the last attach
    pub fn sender(&self) -> Option<SinkEventSender> {
        self.lock().events.clone()
    }
}

impl AudioSink for RecordingSink {
    fn attach(&mut self, events: SinkEventSender) {
        let mut inner = self.lock();
        inner.calls.push(SinkCall::Attach);
        inner.events = Some(events);
    }

    fn detach(&mut self) {
        let mut inner = self.lock();
        inner.calls.push(SinkCall::Detach);
        inner.events = None;
    }

    fn load(&mut self, load: LoadId, address: &ResourceAddress) {
        let mut inner = self.lock();
        inner.calls.push(SinkCall::Load(load, address.clone()));
        inner.current = Some((load, address.clone()));
    }

    fn play(&mut self) {
        self.lock().calls.push(SinkCall::Play);
    }

    fn pause(&mut self) {
        self.lock().calls.push(SinkCall::Pause);
    }

    fn halt(&mut self) {
        let mut inner = self.lock();
        inner.calls.push(SinkCall::Halt);
        inner.current = None;
    }

    fn set_rate(&mut self, rate: f32) {
        self.lock().calls.push(SinkCall::SetRate(rate));
    }
}

/// Warmer that remembers every address it was asked to warm
#[derive(Debug, Clone, Default)]
pub struct RecordingWarmer {
    addresses: Arc<Mutex<Vec<ResourceAddress>>>,
}

impl RecordingWarmer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn addresses(&self) -> Vec<ResourceAddress> {
        match self.addresses.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ResourceWarmer for RecordingWarmer {
    fn warm(&self, address: &ResourceAddress) {
        match self.addresses.lock() {
            Ok(mut guard) => guard.push(address.clone()),
            Err(poisoned) => poisoned.into_inner().push(address.clone()),
        }
    }
}
