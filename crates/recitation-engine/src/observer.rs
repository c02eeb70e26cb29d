//! Notifications from the engine to whoever renders it

use crate::state::PlaybackSnapshot;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Output-only hints; nothing sent here feeds back into transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineNotification {
    StatusChanged(PlaybackSnapshot),
    /// Bring this global verse into view
    ScrollTo(u32),
    /// This global verse started buffering
    Loading(u32),
    /// This global verse is ready to play through
    Ready(u32),
    Stopped,
}

#[derive(Debug, Default)]
pub struct Observers {
    subscribers: Vec<Sender<EngineNotification>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<EngineNotification> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Sends to every subscriber, dropping those that hung up
    pub fn notify(&mut self, notification: EngineNotification) {
        self.subscribers
            .retain(|subscriber| subscriber.send(notification.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_notified() {
        let mut observers = Observers::new();
        let first = observers.subscribe();
        let second = observers.subscribe();

        observers.notify(EngineNotification::ScrollTo(8));

        assert_eq!(first.try_recv().unwrap(), EngineNotification::ScrollTo(8));
        assert_eq!(second.try_recv().unwrap(), EngineNotification::ScrollTo(8));
    }

    #[test]
    fn test_disconnected_subscribers_pruned() {
        let mut observers = Observers::new();
        let kept = observers.subscribe();
        drop(observers.subscribe());

        observers.notify(EngineNotification::Stopped);
        assert_eq!(observers.len(), 1);
        assert_eq!(kept.try_recv().unwrap(), EngineNotification::Stopped);
    }
}
