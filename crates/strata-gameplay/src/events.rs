//! Append-only destruction log with channel subscribers.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::destruction::DestructionEvent;

/// Default capacity of each subscriber channel.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 1024;

/// Ordered record of every destruction, fanned out to subscribers.
///
/// The log never drops entries on its own; consumers decide when events
/// have outlived their replay window and call [`DestructionLog::prune_before`]
/// or [`DestructionLog::prune_expired`].
#[derive(Debug)]
pub struct DestructionLog {
    /// Retained events, oldest first
    events: Vec<DestructionEvent>,
    /// Live subscriber channels
    subscribers: Vec<Sender<DestructionEvent>>,
    /// Per-subscriber channel capacity
    capacity: usize,
}

impl Default for DestructionLog {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}

impl DestructionLog {
    /// Creates an empty log whose subscriber channels hold `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            subscribers: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Appends an event and forwards it to every subscriber.
    pub fn append(&mut self, event: DestructionEvent) {
        self.events.push(event);
        // Non-blocking send - a full subscriber misses the event, a
        // disconnected one is forgotten.
        self.subscribers
            .retain(|tx| !matches!(tx.try_send(event), Err(TrySendError::Disconnected(_))));
    }

    /// Opens a new subscription. Only events appended afterwards are sent.
    pub fn subscribe(&mut self) -> Receiver<DestructionEvent> {
        let (tx, rx) = bounded(self.capacity);
        self.subscribers.push(tx);
        rx
    }

    /// Number of live subscribers as of the last append.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Retained events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[DestructionEvent] {
        &self.events
    }

    /// Retained events at or after `tick`.
    pub fn since(&self, tick: u64) -> impl Iterator<Item = &DestructionEvent> + '_ {
        self.events.iter().filter(move |e| e.tick >= tick)
    }

    /// Most recent event.
    #[must_use]
    pub fn last(&self) -> Option<&DestructionEvent> {
        self.events.last()
    }

    /// Drops events that happened before `tick`. Returns how many went.
    pub fn prune_before(&mut self, tick: u64) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.tick >= tick);
        before - self.events.len()
    }

    /// Drops events whose retention window has closed by `now`.
    pub fn prune_expired(&mut self, now: u64) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.expires_at() > now);
        before - self.events.len()
    }

    /// Number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no events are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destruction::DestructionKind;

    fn event(tick: u64, retain_ticks: u64) -> DestructionEvent {
        DestructionEvent {
            x: 1,
            y: 2,
            radius: 3.0,
            tick,
            kind: DestructionKind::Direct,
            cleared: 0,
            transformed: 0,
            retain_ticks,
        }
    }

    #[test]
    fn test_append_is_ordered() {
        let mut log = DestructionLog::default();
        log.append(event(1, 10));
        log.append(event(5, 10));
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].tick, 1);
        assert_eq!(log.last().map(|e| e.tick), Some(5));
        assert_eq!(log.since(2).count(), 1);
    }

    #[test]
    fn test_subscribers_receive_new_events() {
        let mut log = DestructionLog::default();
        log.append(event(0, 1));
        let rx = log.subscribe();
        log.append(event(1, 1));
        log.append(event(2, 1));
        let received: Vec<u64> = rx.try_iter().map(|e| e.tick).collect();
        assert_eq!(received, vec![1, 2]);
    }

    #[test]
    fn test_dropped_subscriber_is_removed() {
        let mut log = DestructionLog::default();
        let rx = log.subscribe();
        let _kept = log.subscribe();
        drop(rx);
        log.append(event(0, 1));
        assert_eq!(log.subscriber_count(), 1);
    }

    #[test]
    fn test_full_subscriber_misses_but_stays() {
        let mut log = DestructionLog::new(1);
        let rx = log.subscribe();
        log.append(event(0, 1));
        log.append(event(1, 1));
        assert_eq!(log.subscriber_count(), 1);
        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_pruning() {
        let mut log = DestructionLog::default();
        log.append(event(0, 5));
        log.append(event(3, 100));
        log.append(event(10, 1));
        assert_eq!(log.prune_expired(6), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.prune_before(10), 1);
        assert_eq!(log.events()[0].tick, 10);
    }
}
