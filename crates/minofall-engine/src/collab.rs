use std::io;

use crate::{engine::Mode, event::Key, stats::GameStats};

/// Result of advancing the falling piece by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The piece moved down one row.
    Descended,
    /// The piece touched down but is not fixed yet; the caller should
    /// grant a lock delay before the next step.
    Landed,
    /// The piece locked into place and a replacement spawned.
    Locked { cleared_lines: u32 },
    /// The replacement piece could not spawn; the stack reached the top.
    ToppedOut,
}

/// The playfield: piece movement rules and the settled stack.
///
/// `Clone + Send` so the engine can hand a snapshot of the playfield to
/// the advisor's background computation.
pub trait Board: Clone + Send + 'static {
    /// Wipes the stack and spawns a fresh piece.
    fn clear(&mut self);

    /// Advances gravity by one step.
    fn step_down(&mut self) -> StepOutcome;

    /// Drops the piece to the floor and locks it immediately.
    fn hard_drop(&mut self) -> StepOutcome;

    /// Returns whether the piece moved.
    fn move_left(&mut self) -> bool;
    fn move_right(&mut self) -> bool;
    fn rotate_cw(&mut self) -> bool;
    fn rotate_ccw(&mut self) -> bool;
}

/// Rendering target driven by the control loop.
///
/// Failures are surfaced so the engine can log them; they are never fatal
/// to gameplay.
pub trait View<B: Board>: Send {
    /// Redraws the whole screen from the current state.
    fn refresh_screen(&mut self, board: &B, stats: &GameStats, mode: Mode) -> io::Result<()>;

    /// Plays the self-timed game-over sequence.
    fn show_game_over_animation(&mut self, board: &B, stats: &GameStats) -> io::Result<()>;
}

/// Persistent high-score list.
pub trait Ranking: Send {
    fn insert_score(&mut self, score: u64);

    /// Persists the list. Best effort: the engine logs failures and moves
    /// on.
    fn save(&mut self) -> io::Result<()>;
}

/// Background move advisor.
///
/// The engine spawns `compute_best_queue` on its own thread with a board
/// snapshot, so implementations keep their queue behind interior
/// mutability. `process_queue` runs on the control loop, applies at most
/// one queued move per call, and reports a lock outcome when the move
/// fixed the piece so the engine can account for it.
pub trait Advisor<B: Board>: Send + Sync {
    fn compute_best_queue(&self, board: &B);
    fn process_queue(&self, board: &mut B) -> Option<StepOutcome>;
}

/// Board editor active while the engine is in edit mode.
pub trait Editor<B: Board>: Send {
    fn enter(&mut self, board: &mut B);
    fn leave(&mut self, board: &mut B);
    fn handle_key(&mut self, board: &mut B, key: Key);
}
