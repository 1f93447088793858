use std::{io, time::Duration};

/// A key press, already normalized from the terminal backend.
///
/// Only the keys the game reacts to are represented; everything else is
/// filtered out by the event source implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Esc,
    Char(char),
}

/// Events produced by a terminal event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEvent {
    /// A key press.
    Key(Key),
    /// The terminal was resized.
    Resize,
    /// Sentinel asking the polling loop to exit.
    Shutdown,
    /// Any event the game does not react to (mouse, focus, paste, ...).
    Other,
}

/// Events delivered to the control loop through the input relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub enum InputEvent {
    /// A key press relayed from the polling loop.
    Key(Key),
    /// Terminal resize; triggers an unconditional redraw in every mode.
    Resize,
    /// Wake-up sentinel injected when a stop is requested.
    ///
    /// Carries no payload; the control loop re-checks the stop latch on
    /// every iteration, this event only interrupts a blocking wait.
    Stop,
}

/// Blocking source of terminal events, owned by the polling loop.
///
/// `poll` must return `Ok(true)` once an event is ready to be `read`
/// without blocking. Implementations wrap a real terminal backend or a
/// scripted queue in tests.
pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<SourceEvent>;
}
