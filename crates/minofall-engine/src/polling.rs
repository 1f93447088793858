use std::time::Duration;

use log::{debug, warn};

use crate::{
    engine::EngineHandle,
    event::{EventSource, InputEvent, SourceEvent},
};

/// How long one blocking poll of the event source lasts before the loop
/// re-checks the stop latch. Bounds the shutdown latency of the loop.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Runs the input polling loop until a stop is requested.
///
/// This is the only task that reads the terminal event source. It never
/// touches engine state: key and resize events are relayed through the
/// bounded queue (dropping the newest event when full, so the loop never
/// blocks), and everything else is discarded. The loop exits when the
/// engine's stop latch is set or the source delivers a shutdown sentinel.
pub fn run_polling_loop<S: EventSource>(mut source: S, handle: &EngineHandle) {
    debug!("polling loop started");

    while !handle.is_stop_requested() {
        match source.poll(POLL_TIMEOUT) {
            Ok(false) => {}
            Ok(true) => match source.read() {
                Ok(SourceEvent::Key(key)) => {
                    handle.offer(InputEvent::Key(key));
                }
                Ok(SourceEvent::Resize) => {
                    handle.offer(InputEvent::Resize);
                }
                Ok(SourceEvent::Shutdown) => break,
                Ok(SourceEvent::Other) => {}
                Err(err) => {
                    warn!("event source read failed: {err}");
                    break;
                }
            },
            Err(err) => {
                warn!("event source poll failed: {err}");
                break;
            }
        }
    }

    debug!("polling loop stopped");
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, io, sync::Arc};

    use super::*;
    use crate::{
        collab::{Advisor, Board, Editor, Ranking, StepOutcome, View},
        engine::{Engine, Mode},
        event::Key,
        stats::GameStats,
    };

    struct ScriptedSource {
        events: VecDeque<SourceEvent>,
    }

    impl ScriptedSource {
        fn new(events: impl IntoIterator<Item = SourceEvent>) -> Self {
            Self {
                events: events.into_iter().collect(),
            }
        }
    }

    impl EventSource for ScriptedSource {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<SourceEvent> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    // Minimal no-op collaborators; the polling loop only needs an engine
    // handle to feed.
    #[derive(Clone, Default)]
    struct StubBoard;

    impl Board for StubBoard {
        fn clear(&mut self) {}

        fn step_down(&mut self) -> StepOutcome {
            StepOutcome::Descended
        }

        fn hard_drop(&mut self) -> StepOutcome {
            StepOutcome::Locked { cleared_lines: 0 }
        }

        fn move_left(&mut self) -> bool {
            false
        }

        fn move_right(&mut self) -> bool {
            false
        }

        fn rotate_cw(&mut self) -> bool {
            false
        }

        fn rotate_ccw(&mut self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct StubView;

    impl View<StubBoard> for StubView {
        fn refresh_screen(
            &mut self,
            _board: &StubBoard,
            _stats: &GameStats,
            _mode: Mode,
        ) -> io::Result<()> {
            Ok(())
        }

        fn show_game_over_animation(
            &mut self,
            _board: &StubBoard,
            _stats: &GameStats,
        ) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubRanking;

    impl Ranking for StubRanking {
        fn insert_score(&mut self, _score: u64) {}

        fn save(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubEditor;

    impl Editor<StubBoard> for StubEditor {
        fn enter(&mut self, _board: &mut StubBoard) {}

        fn leave(&mut self, _board: &mut StubBoard) {}

        fn handle_key(&mut self, _board: &mut StubBoard, _key: Key) {}
    }

    #[derive(Default)]
    struct StubAdvisor;

    impl Advisor<StubBoard> for StubAdvisor {
        fn compute_best_queue(&self, _board: &StubBoard) {}

        fn process_queue(&self, _board: &mut StubBoard) -> Option<StepOutcome> {
            None
        }
    }

    fn stub_engine() -> Engine<StubBoard> {
        Engine::new(
            StubBoard,
            StubView,
            StubRanking,
            Arc::new(StubAdvisor) as Arc<dyn Advisor<StubBoard>>,
            StubEditor,
        )
    }

    #[test]
    fn relays_keys_and_resizes_until_shutdown() {
        let engine = stub_engine();
        let handle = engine.handle();

        let source = ScriptedSource::new([
            SourceEvent::Key(Key::Char('n')),
            SourceEvent::Resize,
            SourceEvent::Other,
            SourceEvent::Shutdown,
            // Never reached.
            SourceEvent::Key(Key::Char('q')),
        ]);
        run_polling_loop(source, &handle);

        assert_eq!(
            engine.events().try_recv(),
            Some(InputEvent::Key(Key::Char('n'))),
        );
        assert_eq!(engine.events().try_recv(), Some(InputEvent::Resize));
        assert_eq!(engine.events().try_recv(), None);
    }

    #[test]
    fn exits_once_stop_is_requested() {
        let engine = stub_engine();
        let handle = engine.handle();
        handle.stop();

        // An endless source: the loop must exit via the latch, not the
        // script running dry.
        let source = ScriptedSource::new(vec![SourceEvent::Resize; 64]);
        run_polling_loop(source, &handle);

        // Only the stop sentinel is in the queue; no event was read.
        assert_eq!(engine.events().try_recv(), Some(InputEvent::Stop));
        assert_eq!(engine.events().try_recv(), None);
    }

    #[test]
    fn stops_on_read_errors() {
        let engine = stub_engine();
        let handle = engine.handle();

        struct FailingSource;

        impl EventSource for FailingSource {
            fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
                Ok(true)
            }

            fn read(&mut self) -> io::Result<SourceEvent> {
                Err(io::Error::other("terminal gone"))
            }
        }

        run_polling_loop(FailingSource, &handle);
        assert_eq!(engine.events().try_recv(), None);
    }
}
