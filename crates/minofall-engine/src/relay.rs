use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError},
    time::Instant,
};

use log::debug;

use crate::event::InputEvent;

/// Capacity of the input relay between the polling loop and the control
/// loop. Events offered beyond this are dropped, never queued.
pub const RELAY_CAPACITY: usize = 8;

/// Creates the bounded relay connecting the polling loop to the control
/// loop.
#[must_use]
pub fn relay() -> (RelaySender, RelayReceiver) {
    let (tx, rx) = mpsc::sync_channel(RELAY_CAPACITY);
    (RelaySender { tx }, RelayReceiver { rx })
}

/// Producer half of the input relay.
///
/// Enqueueing never blocks: when the queue is full the newest event is
/// dropped so the polling loop stays responsive.
#[derive(Debug, Clone)]
pub struct RelaySender {
    tx: SyncSender<InputEvent>,
}

impl RelaySender {
    /// Offers an event to the control loop.
    ///
    /// Returns `false` when the event was dropped (queue full or the
    /// control loop is gone).
    pub fn offer(&self, event: InputEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                debug!("input relay full, dropping {event:?}");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Outcome of a bounded wait on the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayWait {
    Event(InputEvent),
    TimedOut,
    Disconnected,
}

/// Consumer half of the input relay, owned by the control loop.
#[derive(Debug)]
pub struct RelayReceiver {
    rx: Receiver<InputEvent>,
}

impl RelayReceiver {
    /// Waits for the next event until `deadline`.
    pub fn recv_until(&self, deadline: Instant) -> RelayWait {
        let timeout = deadline.saturating_duration_since(Instant::now());
        match self.rx.recv_timeout(timeout) {
            Ok(event) => RelayWait::Event(event),
            Err(RecvTimeoutError::Timeout) => RelayWait::TimedOut,
            Err(RecvTimeoutError::Disconnected) => RelayWait::Disconnected,
        }
    }

    /// Waits for the next event with no deadline.
    pub fn recv_blocking(&self) -> RelayWait {
        match self.rx.recv() {
            Ok(event) => RelayWait::Event(event),
            Err(_) => RelayWait::Disconnected,
        }
    }

    /// Removes and returns the next event if one is already queued.
    pub fn try_recv(&self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }

    /// Discards every queued event.
    pub fn drain(&self) {
        while self.rx.try_recv().is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Key;

    fn key(c: char) -> InputEvent {
        InputEvent::Key(Key::Char(c))
    }

    #[test]
    fn keeps_the_oldest_events_under_flood() {
        let (tx, rx) = relay();

        let accepted = ('a'..='l').filter(|&c| tx.offer(key(c))).count();
        assert_eq!(accepted, RELAY_CAPACITY, "queue must cap at capacity");

        // The retained events are the first eight, in order.
        for c in 'a'..='h' {
            assert_eq!(rx.try_recv(), Some(key(c)));
        }
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn offer_never_blocks_when_full() {
        let (tx, _rx) = relay();
        for _ in 0..RELAY_CAPACITY {
            assert!(tx.offer(InputEvent::Resize));
        }
        // Queue is full; this must return instead of blocking.
        assert!(!tx.offer(InputEvent::Resize));
    }

    #[test]
    fn drain_empties_the_queue() {
        let (tx, rx) = relay();
        for c in 'a'..='e' {
            tx.offer(key(c));
        }
        rx.drain();
        assert_eq!(rx.try_recv(), None);
        // The relay stays usable afterwards.
        assert!(tx.offer(key('z')));
        assert_eq!(rx.try_recv(), Some(key('z')));
    }

    #[test]
    fn recv_until_times_out_on_empty_queue() {
        let (_tx, rx) = relay();
        let wait = rx.recv_until(Instant::now());
        assert_eq!(wait, RelayWait::TimedOut);
    }

    #[test]
    fn recv_reports_disconnect() {
        let (tx, rx) = relay();
        drop(tx);
        assert_eq!(rx.recv_blocking(), RelayWait::Disconnected);
    }
}
