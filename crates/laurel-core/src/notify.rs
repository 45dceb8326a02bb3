//! Award notifications for external observers
//!
//! Delivery is best-effort: each subscriber owns a bounded buffer, a full
//! buffer drops the event and a dropped receiver is pruned on the next
//! publish. Publishing never blocks the writer.

use crate::{AwardRecord, IssuerId, MetadataId, SummonerId};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Emitted once per successful award
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEvent {
    pub summoner_id: SummonerId,
    pub metadata_id: MetadataId,
    pub owner: IssuerId,
    pub timestamp: u64,
}

impl AwardEvent {
    /// Build the event for a freshly committed award
    pub fn new(record: &AwardRecord, owner: IssuerId) -> Self {
        Self {
            summoner_id: record.summoner_id,
            metadata_id: record.metadata_id,
            owner,
            timestamp: record.timestamp,
        }
    }
}

/// Fan-out of award events to any number of subscribers
#[derive(Debug)]
pub struct Notifier {
    capacity: usize,
    subscribers: Mutex<Vec<Sender<AwardEvent>>>,
}

impl Notifier {
    /// Create a notifier whose subscribers buffer up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Receiver<AwardEvent> {
        let (tx, rx) = crossbeam_channel::bounded(self.capacity);
        self.subscribers.lock().push(tx);
        rx
    }

    /// Number of live subscribers (as of the last publish)
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Deliver an event to every subscriber that has room for it
    pub fn publish(&self, event: &AwardEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    summoner = event.summoner_id.raw(),
                    metadata = event.metadata_id.raw(),
                    "award notification dropped, subscriber buffer full"
                );
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NOTIFY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(summoner: u64) -> AwardEvent {
        AwardEvent {
            summoner_id: SummonerId::new(summoner),
            metadata_id: MetadataId::new(1),
            owner: IssuerId::new("a"),
            timestamp: 10,
        }
    }

    #[test]
    fn test_fan_out() {
        let notifier = Notifier::new(4);
        let first = notifier.subscribe();
        let second = notifier.subscribe();

        notifier.publish(&event(0));

        assert_eq!(first.try_recv().unwrap(), event(0));
        assert_eq!(second.try_recv().unwrap(), event(0));
    }

    #[test]
    fn test_full_buffer_drops() {
        let notifier = Notifier::new(1);
        let rx = notifier.subscribe();

        notifier.publish(&event(0));
        notifier.publish(&event(1));

        assert_eq!(rx.try_recv().unwrap(), event(0));
        assert!(rx.try_recv().is_err());
        assert_eq!(notifier.subscriber_count(), 1);
    }

    #[test]
    fn test_disconnected_pruned() {
        let notifier = Notifier::new(2);
        let rx = notifier.subscribe();
        drop(rx);

        notifier.publish(&event(0));
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
