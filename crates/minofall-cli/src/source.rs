use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use minofall_engine::{EventSource, Key, SourceEvent};

/// Terminal event source backed by crossterm.
///
/// Owned by the polling loop; nothing else reads terminal events.
#[derive(Debug, Default)]
pub struct CrosstermSource;

impl EventSource for CrosstermSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<SourceEvent> {
        Ok(match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => map_key(&key),
            Event::Resize(..) => SourceEvent::Resize,
            _ => SourceEvent::Other,
        })
    }
}

fn map_key(key: &KeyEvent) -> SourceEvent {
    // Ctrl-C behaves like escape: quit, or back out of the editor.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return SourceEvent::Key(Key::Esc);
    }
    let key = match key.code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => return SourceEvent::Other,
    };
    SourceEvent::Key(key)
}
