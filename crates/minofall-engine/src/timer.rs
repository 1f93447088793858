use std::time::{Duration, Instant};

/// One-shot countdown timer driven by the control loop's clock.
///
/// The timer fires at most once per arm: `poll` reports an elapsed
/// deadline exactly once and disarms the timer in the same step. An
/// elapsed deadline that has not been polled yet is a *pending fire*;
/// both `disarm` and `reset` drop it, so a stale fire can never be
/// mistaken for the new cycle's fire.
///
/// At any observation point the timer is either armed or
/// disarmed-and-drained; there is no third state.
#[derive(Debug, Default)]
pub struct CountdownTimer {
    deadline: Option<Instant>,
}

impl CountdownTimer {
    /// Creates a disarmed timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to fire `duration` from now.
    ///
    /// Any pending fire from a previous arm is dropped.
    pub fn arm(&mut self, duration: Duration) {
        self.deadline = Some(Instant::now() + duration);
    }

    /// Disarms the timer, draining any pending fire.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Stops, drains, and rearms in one step.
    pub fn reset(&mut self, duration: Duration) {
        self.disarm();
        self.arm(duration);
    }

    /// Reports whether the timer has fired, at most once per arm.
    ///
    /// A `true` return disarms the timer; subsequent polls return `false`
    /// until the next arm.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The instant the timer will fire, if armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
