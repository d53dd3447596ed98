//! Subscriber that hands events to another thread over a bounded channel.

use super::Subscriber;
use crate::types::DataEvent;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Forwards events into a bounded channel without blocking the publisher.
///
/// Events that do not fit (or arrive after the receiver is gone) are dropped
/// and counted.
pub struct ChannelSubscriber {
    sender: Sender<DataEvent>,
    dropped: AtomicU64,
}

impl ChannelSubscriber {
    /// Create a subscriber and the receiving end of its channel.
    ///
    /// A capacity of 0 is raised to 1: `notify` never blocks, so a
    /// rendezvous channel would drop nearly every event.
    pub fn new(capacity: usize) -> (Self, EventReceiver) {
        let (sender, receiver) = bounded(capacity.max(1));
        let subscriber = Self {
            sender,
            dropped: AtomicU64::new(0),
        };
        (subscriber, EventReceiver { receiver })
    }

    /// Events dropped because the channel was full or disconnected.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Subscriber for ChannelSubscriber {
    fn notify(&self, event: &DataEvent) {
        match self.sender.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(record = event.record_number(), "channel full, event dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(record = event.record_number(), "receiver gone, event dropped");
            }
        }
    }
}

/// Receiving end of a [`ChannelSubscriber`].
pub struct EventReceiver {
    receiver: Receiver<DataEvent>,
}

impl EventReceiver {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<DataEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<DataEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<DataEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> Vec<DataEvent> {
        self.receiver.try_iter().collect()
    }
}
