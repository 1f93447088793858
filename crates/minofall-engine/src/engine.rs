use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use crate::{
    collab::{Advisor, Board, Editor, Ranking, StepOutcome, View},
    event::{InputEvent, Key},
    relay::{self, RelayReceiver, RelaySender, RelayWait},
    stats::GameStats,
    timer::CountdownTimer,
};

/// The advisor timer runs this many times faster than the gravity timer,
/// so the advisor gets several think-cycles per piece descent.
pub const AI_TICK_DIVIDER: u32 = 8;

/// Grace period between a piece touching down and being fixed.
pub const LOCK_DELAY: Duration = Duration::from_millis(500);

/// Play mode of the engine. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Mode {
    /// Initial mode; also entered on lock-out. Counters keep their values
    /// until the next new game.
    GameOver,
    Running,
    RunningWithAi,
    Paused,
    /// Showing the board without gravity, e.g. after leaving the editor.
    Preview,
    Edit,
    /// Terminal mode; no operation has any effect past this point.
    Stopped,
}

impl Mode {
    /// Whether gravity is active (the tick timer is armed).
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Mode::Running | Mode::RunningWithAi)
    }
}

/// Shared latch that requests control-loop and polling-loop shutdown.
#[derive(Debug, Clone, Default)]
struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Latches the request. Returns `true` only for the first caller.
    fn request(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cloneable handle for the threads around the engine: the polling loop
/// feeds events through it and anyone may request a stop.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    relay: RelaySender,
    stop: StopSignal,
}

impl EngineHandle {
    /// Offers an event to the control loop without blocking.
    ///
    /// Returns `false` when the event was dropped because the relay is
    /// full.
    pub fn offer(&self, event: InputEvent) -> bool {
        self.relay.offer(event)
    }

    /// Requests engine shutdown. Idempotent.
    ///
    /// The sentinel enqueued here only interrupts a blocking wait; when
    /// the relay is full the queue is already non-empty and the control
    /// loop wakes up on its own, so a dropped sentinel is harmless.
    pub fn stop(&self) {
        if self.stop.request() {
            self.relay.offer(InputEvent::Stop);
        }
    }

    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_requested()
    }
}

/// The game engine: play-mode state machine, both timers, the input
/// relay, counters, and the control loop multiplexing all of it.
///
/// All engine state is mutated exclusively by the control loop (or, before
/// `run`, by the thread that owns the value), so no locking is needed
/// beyond the relay itself. The polling loop and the advisor's background
/// computation communicate only through the relay and the advisor's own
/// internal queue.
pub struct Engine<B: Board> {
    mode: Mode,
    stats: GameStats,
    ai_enabled: bool,
    stopped: bool,
    tick_timer: CountdownTimer,
    advisor_timer: CountdownTimer,
    events: RelayReceiver,
    relay: RelaySender,
    stop_signal: StopSignal,
    board: B,
    view: Box<dyn View<B>>,
    ranking: Box<dyn Ranking>,
    advisor: Arc<dyn Advisor<B>>,
    editor: Box<dyn Editor<B>>,
}

impl<B: Board> Engine<B> {
    /// Creates an engine in `GameOver` mode with both timers disarmed and
    /// the idle gravity placeholder; `NewGame` starts actual play.
    pub fn new(
        board: B,
        view: impl View<B> + 'static,
        ranking: impl Ranking + 'static,
        advisor: Arc<dyn Advisor<B>>,
        editor: impl Editor<B> + 'static,
    ) -> Self {
        let (relay, events) = relay::relay();
        Self {
            mode: Mode::GameOver,
            stats: GameStats::new(),
            ai_enabled: false,
            stopped: false,
            tick_timer: CountdownTimer::new(),
            advisor_timer: CountdownTimer::new(),
            events,
            relay,
            stop_signal: StopSignal::default(),
            board,
            view: Box::new(view),
            ranking: Box::new(ranking),
            advisor,
            editor: Box::new(editor),
        }
    }

    /// Handle for the polling loop and for external shutdown.
    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            relay: self.relay.clone(),
            stop: self.stop_signal.clone(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn is_ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[cfg(test)]
    pub(crate) fn events(&self) -> &RelayReceiver {
        &self.events
    }

    /// Runs the control loop until a stop is requested, then returns the
    /// stopped engine.
    ///
    /// Each iteration services exactly one ready event source: the stop
    /// latch always wins; otherwise a tick-timer fire, an advisor-timer
    /// fire, or one relayed input event, whichever is ready first.
    pub fn run(mut self) -> Self {
        info!("engine control loop started");
        self.refresh_view();

        loop {
            if self.stop_signal.is_requested() {
                self.stop();
                break;
            }

            let now = Instant::now();
            if self.tick_timer.poll(now) {
                self.tick();
                continue;
            }
            if self.advisor_timer.poll(now) {
                self.advisor_cycle();
                continue;
            }

            if let Some(event) = self.wait_for_event() {
                self.handle_input(event);
            }
        }

        info!("engine control loop stopped");
        self
    }

    /// Blocks until an input event arrives or the nearest timer deadline
    /// passes.
    fn wait_for_event(&mut self) -> Option<InputEvent> {
        let wait = match self.next_deadline() {
            Some(deadline) => self.events.recv_until(deadline),
            None => self.events.recv_blocking(),
        };
        match wait {
            RelayWait::Event(event) => Some(event),
            RelayWait::TimedOut => None,
            RelayWait::Disconnected => {
                // Every producer is gone; nothing can wake us again.
                self.stop_signal.request();
                None
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        [self.tick_timer.deadline(), self.advisor_timer.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => {
                self.process_key(key);
                self.refresh_view();
            }
            // Resize redraws in every mode, including edit and preview.
            InputEvent::Resize => self.refresh_view(),
            InputEvent::Stop => {}
        }
    }

    fn process_key(&mut self, key: Key) {
        match self.mode {
            Mode::Running | Mode::RunningWithAi => self.process_play_key(key),
            Mode::Paused => match key {
                Key::Char('p') => self.unpause(),
                Key::Char('n') => self.new_game(),
                Key::Char('a') => self.toggle_ai(),
                Key::Char('q') | Key::Esc => self.stop(),
                _ => {}
            },
            Mode::GameOver => match key {
                Key::Char('n') | Key::Enter => self.new_game(),
                Key::Char('a') => self.toggle_ai(),
                Key::Char('e') => self.enter_edit_mode(),
                Key::Char('b') => self.preview_board(),
                Key::Char('q') | Key::Esc => self.stop(),
                _ => {}
            },
            Mode::Preview => match key {
                Key::Char('e') => self.enter_edit_mode(),
                Key::Char('q') | Key::Esc => self.stop(),
                _ => {}
            },
            Mode::Edit => match key {
                Key::Char('e') | Key::Esc => self.leave_edit_mode(),
                _ => self.editor.handle_key(&mut self.board, key),
            },
            Mode::Stopped => {}
        }
    }

    fn process_play_key(&mut self, key: Key) {
        match key {
            Key::Left => {
                self.board.move_left();
            }
            Key::Right => {
                self.board.move_right();
            }
            Key::Down => {
                let outcome = self.board.step_down();
                self.handle_step(outcome);
            }
            Key::Up => {
                let outcome = self.board.hard_drop();
                self.handle_step(outcome);
            }
            Key::Char('z') => {
                self.board.rotate_ccw();
            }
            Key::Char('x') => {
                self.board.rotate_cw();
            }
            Key::Char('p') => self.pause(),
            Key::Char('a') => self.toggle_ai(),
            Key::Char('e') => self.enter_edit_mode(),
            Key::Char('q') | Key::Esc => self.stop(),
            _ => {}
        }
    }

    /// One gravity step, paced by the tick timer.
    fn tick(&mut self) {
        let outcome = self.board.step_down();
        self.handle_step(outcome);
        self.refresh_view();
    }

    /// One advisor think-cycle, paced by the advisor timer.
    fn advisor_cycle(&mut self) {
        if let Some(outcome) = self.advisor.process_queue(&mut self.board) {
            self.handle_step(outcome);
        }
        // The processed move may have ended the game; only rearm while
        // the advisor is still driving.
        if self.mode.is_running_with_ai() {
            self.advisor_timer.arm(self.advisor_period());
        }
        self.refresh_view();
    }

    fn handle_step(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Descended => self.reset_timer(Duration::ZERO),
            StepOutcome::Landed => self.reset_timer(LOCK_DELAY),
            StepOutcome::Locked { cleared_lines } => {
                self.stats.add_cleared_lines(cleared_lines);
                self.request_advisor_queue();
                self.reset_timer(Duration::ZERO);
            }
            StepOutcome::ToppedOut => self.game_over(),
        }
    }

    /// Rearms the tick timer, draining any pending fire first.
    ///
    /// A zero duration selects the regular gravity period; a nonzero one
    /// is an explicit override such as the lock delay.
    pub fn reset_timer(&mut self, duration: Duration) {
        if self.reject_after_stop("reset_timer") {
            return;
        }
        let duration = if duration.is_zero() {
            self.stats.tick_time()
        } else {
            duration
        };
        self.tick_timer.reset(duration);
    }

    /// Starts a new game from `GameOver` or `Paused`.
    pub fn new_game(&mut self) {
        if !matches!(self.mode, Mode::GameOver | Mode::Paused) {
            debug!("new game ignored in mode {:?}", self.mode);
            return;
        }
        info!("new game (ai: {})", self.ai_enabled);

        self.board.clear();
        self.stats.reset();
        // Key presses queued before the game existed must not act on it.
        self.events.drain();
        self.request_advisor_queue();
        self.resume();
    }

    /// Suspends play, disarming and draining both timers.
    pub fn pause(&mut self) {
        if !self.mode.is_playing() {
            debug!("pause ignored in mode {:?}", self.mode);
            return;
        }
        self.tick_timer.disarm();
        self.advisor_timer.disarm();
        self.mode = Mode::Paused;
    }

    /// Resumes from `Paused` into the mode matching the AI flag, rearming
    /// the timers at the current periods.
    pub fn unpause(&mut self) {
        if !self.mode.is_paused() {
            debug!("unpause ignored in mode {:?}", self.mode);
            return;
        }
        self.resume();
    }

    fn resume(&mut self) {
        self.tick_timer.arm(self.stats.tick_time());
        if self.ai_enabled {
            self.advisor_timer.arm(self.advisor_period());
            self.mode = Mode::RunningWithAi;
        } else {
            self.mode = Mode::Running;
        }
    }

    /// Ends the current game after a lock-out and records the score.
    pub fn game_over(&mut self) {
        if !self.mode.is_playing() {
            debug!("game over ignored in mode {:?}", self.mode);
            return;
        }
        info!(
            "game over: score {} level {} lines {}",
            self.stats.score(),
            self.stats.level(),
            self.stats.cleared_lines(),
        );

        self.pause();
        self.mode = Mode::GameOver;

        if let Err(err) = self.view.show_game_over_animation(&self.board, &self.stats) {
            warn!("game over animation failed: {err}");
        }
        // Keys mashed during the animation must not start the next game.
        self.events.drain();

        self.ranking.insert_score(self.stats.score());
        if let Err(err) = self.ranking.save() {
            warn!("failed to save ranking: {err}");
        }
    }

    fn toggle_ai(&mut self) {
        if self.ai_enabled {
            self.disable_ai();
        } else {
            self.enable_ai();
        }
    }

    /// Turns the advisor on and triggers an immediate queue computation.
    ///
    /// While in a non-playing mode only the flag is set; the advisor
    /// timer is armed on the next resume, keeping suspended modes free of
    /// armed timers.
    pub fn enable_ai(&mut self) {
        if self.reject_after_stop("enable_ai") {
            return;
        }
        self.ai_enabled = true;
        self.request_advisor_queue();
        if self.mode.is_playing() {
            self.advisor_timer.reset(self.advisor_period());
            self.mode = Mode::RunningWithAi;
        }
    }

    /// Turns the advisor off, disarming and draining its timer.
    pub fn disable_ai(&mut self) {
        if self.reject_after_stop("disable_ai") {
            return;
        }
        self.ai_enabled = false;
        self.advisor_timer.disarm();
        if self.mode.is_running_with_ai() {
            self.mode = Mode::Running;
        }
    }

    /// Shows the board without gravity.
    pub fn preview_board(&mut self) {
        if self.reject_after_stop("preview_board") {
            return;
        }
        self.tick_timer.disarm();
        self.advisor_timer.disarm();
        self.mode = Mode::Preview;
    }

    /// Hands the board to the editor collaborator.
    pub fn enter_edit_mode(&mut self) {
        if self.reject_after_stop("enter_edit_mode") {
            return;
        }
        self.tick_timer.disarm();
        self.advisor_timer.disarm();
        self.editor.enter(&mut self.board);
        self.mode = Mode::Edit;
    }

    /// Leaves the editor into preview.
    pub fn leave_edit_mode(&mut self) {
        if !self.mode.is_edit() {
            debug!("leave edit ignored in mode {:?}", self.mode);
            return;
        }
        self.editor.leave(&mut self.board);
        self.mode = Mode::Preview;
    }

    /// Tears the engine down. Idempotent; the first call latches the stop
    /// signal so both loops exit, later calls are no-ops.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.mode = Mode::Stopped;
            self.stop_signal.request();
            info!("engine stopped");
        }
        self.tick_timer.disarm();
        self.advisor_timer.disarm();
    }

    fn advisor_period(&self) -> Duration {
        self.stats.tick_time() / AI_TICK_DIVIDER
    }

    /// Kicks off a best-queue computation on a background thread with a
    /// snapshot of the board, so a slow search never stalls the loop.
    fn request_advisor_queue(&self) {
        if !self.ai_enabled {
            return;
        }
        let advisor = Arc::clone(&self.advisor);
        let board = self.board.clone();
        thread::spawn(move || advisor.compute_best_queue(&board));
    }

    fn refresh_view(&mut self) {
        if let Err(err) = self.view.refresh_screen(&self.board, &self.stats, self.mode) {
            warn!("screen refresh failed: {err}");
        }
    }

    fn reject_after_stop(&self, operation: &str) -> bool {
        if self.stopped {
            debug!("{operation} ignored after stop");
        }
        self.stopped
    }
}
