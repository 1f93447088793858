use minofall_engine::{Board, StepOutcome};

use crate::{
    bag::PieceBag,
    piece::{Piece, PieceKind},
};

pub const WIDTH: usize = 10;
pub const HEIGHT: usize = 20;

type Grid = [[Option<PieceKind>; WIDTH]; HEIGHT];

const EMPTY_GRID: Grid = [[None; WIDTH]; HEIGHT];

/// The playfield: a 10×20 grid of settled cells plus the falling piece.
///
/// Gravity follows the lock-delay protocol: the first step that cannot
/// descend reports `Landed` without fixing the piece, so the engine can
/// grant a grace period; the next blocked step locks it. Any successful
/// move or rotation re-enters the floating state.
#[derive(Debug, Clone)]
pub struct GridBoard {
    grid: Grid,
    falling: Piece,
    bag: PieceBag,
    landed: bool,
    cursor: Option<(usize, usize)>,
}

impl Default for GridBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GridBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::with_bag(PieceBag::new())
    }

    /// Board with a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_bag(PieceBag::with_seed(seed))
    }

    fn with_bag(mut bag: PieceBag) -> Self {
        let falling = Piece::spawn(bag.pop_next());
        Self {
            grid: EMPTY_GRID,
            falling,
            bag,
            landed: false,
            cursor: None,
        }
    }

    /// Settled cell at (x, y); the falling piece is not included.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<PieceKind> {
        self.grid[y][x]
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling
    }

    /// Upcoming pieces, nearest first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.next_pieces()
    }

    /// The grid with the falling piece merged in, for rendering.
    #[must_use]
    pub fn render_rows(&self) -> Grid {
        let mut rows = self.grid;
        for (x, y) in self.falling.cells() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < WIDTH
                && y < HEIGHT
            {
                rows[y][x] = Some(self.falling.kind());
            }
        }
        rows
    }

    /// Editor cursor position, if the editor is active.
    #[must_use]
    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Option<(usize, usize)>) {
        self.cursor = cursor;
    }

    /// Toggles a settled cell between empty and `kind`.
    pub fn toggle_cell(&mut self, x: usize, y: usize, kind: PieceKind) {
        let cell = &mut self.grid[y][x];
        *cell = match cell {
            Some(_) => None,
            None => Some(kind),
        };
    }

    /// Empties the settled stack, keeping the falling piece.
    pub fn wipe(&mut self) {
        self.grid = EMPTY_GRID;
        self.landed = false;
    }

    fn can_place(&self, piece: &Piece) -> bool {
        piece.cells().into_iter().all(|(x, y)| {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                return false;
            };
            x < WIDTH && y < HEIGHT && self.grid[y][x].is_none()
        })
    }

    fn try_shift(&mut self, dx: i16, dy: i16) -> bool {
        let moved = self.falling.shifted(dx, dy);
        if self.can_place(&moved) {
            self.falling = moved;
            self.landed = false;
            true
        } else {
            false
        }
    }

    fn try_rotate(&mut self, rotated: Piece) -> bool {
        // In-place first, then a one-cell kick off either wall.
        for dx in [0, -1, 1] {
            let candidate = rotated.shifted(dx, 0);
            if self.can_place(&candidate) {
                self.falling = candidate;
                self.landed = false;
                return true;
            }
        }
        false
    }

    /// Fixes the falling piece, clears full rows, and spawns the next
    /// piece.
    fn lock_piece(&mut self) -> StepOutcome {
        for (x, y) in self.falling.cells() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < WIDTH
                && y < HEIGHT
            {
                self.grid[y][x] = Some(self.falling.kind());
            }
        }
        let cleared_lines = self.clear_full_rows();
        self.landed = false;

        self.falling = Piece::spawn(self.bag.pop_next());
        if self.can_place(&self.falling) {
            StepOutcome::Locked { cleared_lines }
        } else {
            StepOutcome::ToppedOut
        }
    }

    fn clear_full_rows(&mut self) -> u32 {
        let mut count = 0;
        for y in (0..HEIGHT).rev() {
            if self.grid[y].iter().all(Option::is_some) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.grid[y + count] = self.grid[y];
            }
        }
        for row in &mut self.grid[..count] {
            *row = [None; WIDTH];
        }
        u32::try_from(count).expect("row count fits u32")
    }
}

impl Board for GridBoard {
    fn clear(&mut self) {
        self.grid = EMPTY_GRID;
        self.landed = false;
        self.cursor = None;
        self.falling = Piece::spawn(self.bag.pop_next());
    }

    fn step_down(&mut self) -> StepOutcome {
        if self.try_shift(0, 1) {
            StepOutcome::Descended
        } else if self.landed {
            self.lock_piece()
        } else {
            self.landed = true;
            StepOutcome::Landed
        }
    }

    fn hard_drop(&mut self) -> StepOutcome {
        while self.try_shift(0, 1) {}
        self.lock_piece()
    }

    fn move_left(&mut self) -> bool {
        self.try_shift(-1, 0)
    }

    fn move_right(&mut self) -> bool {
        self.try_shift(1, 0)
    }

    fn rotate_cw(&mut self) -> bool {
        self.try_rotate(self.falling.rotated_cw())
    }

    fn rotate_ccw(&mut self) -> bool {
        self.try_rotate(self.falling.rotated_ccw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> GridBoard {
        GridBoard::with_seed(42)
    }

    fn fill_row(board: &mut GridBoard, y: usize) {
        for x in 0..WIDTH {
            board.toggle_cell(x, y, PieceKind::I);
        }
    }

    mod gravity {
        use super::*;

        #[test]
        fn descends_then_lands_then_locks() {
            let mut board = board();

            let mut outcome = board.step_down();
            let mut steps = 1;
            while outcome == StepOutcome::Descended {
                outcome = board.step_down();
                steps += 1;
                assert!(steps <= HEIGHT + 1, "piece must reach the floor");
            }
            assert_eq!(outcome, StepOutcome::Landed);

            // The next blocked step locks the piece.
            let outcome = board.step_down();
            assert!(matches!(outcome, StepOutcome::Locked { cleared_lines: 0 }));
        }

        #[test]
        fn a_move_restarts_the_lock_delay() {
            let mut board = board();
            while board.step_down() == StepOutcome::Descended {}

            // Lateral movement on the floor floats the piece again.
            if !board.move_left() {
                assert!(board.move_right());
            }
            assert_eq!(board.step_down(), StepOutcome::Landed);
        }

        #[test]
        fn hard_drop_locks_immediately() {
            let mut board = board();
            let outcome = board.hard_drop();
            assert!(matches!(outcome, StepOutcome::Locked { cleared_lines: 0 }));

            // The stack is no longer empty.
            let settled = (0..HEIGHT)
                .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
                .filter(|&(x, y)| board.cell(x, y).is_some())
                .count();
            assert_eq!(settled, 4);
        }
    }

    mod line_clears {
        use super::*;

        #[test]
        fn a_full_row_clears_on_lock() {
            let mut board = board();
            fill_row(&mut board, HEIGHT - 1);

            let outcome = board.hard_drop();
            assert!(matches!(outcome, StepOutcome::Locked { cleared_lines: 1 }));

            // The filled row is gone; only the dropped piece remains.
            let settled = (0..HEIGHT)
                .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
                .filter(|&(x, y)| board.cell(x, y).is_some())
                .count();
            assert_eq!(settled, 4);
        }

        #[test]
        fn stacked_rows_shift_down() {
            let mut board = board();
            fill_row(&mut board, HEIGHT - 1);
            // A marker above the full row.
            board.toggle_cell(0, HEIGHT - 2, PieceKind::T);

            board.hard_drop();
            assert_eq!(board.cell(0, HEIGHT - 1), Some(PieceKind::T));
        }
    }

    mod top_out {
        use super::*;

        #[test]
        fn blocked_spawn_reports_topped_out() {
            let mut board = board();
            // Occupy the whole spawn box so no replacement piece fits.
            for y in 0..2 {
                for x in 3..7 {
                    board.toggle_cell(x, y, PieceKind::I);
                }
            }
            assert_eq!(board.hard_drop(), StepOutcome::ToppedOut);
        }
    }

    mod movement {
        use super::*;

        #[test]
        fn walls_stop_lateral_movement() {
            let mut board = board();
            let mut moves = 0;
            while board.move_left() {
                moves += 1;
                assert!(moves <= WIDTH, "piece must hit the wall");
            }
            assert!(!board.move_left());
        }

        #[test]
        fn rotation_kicks_off_the_wall() {
            let mut board = board();
            while board.move_left() {}
            // Whatever the kind, rotating at the wall either fits in
            // place or kicks one cell; cells stay in bounds either way.
            board.rotate_cw();
            for (x, y) in board.falling_piece().cells() {
                assert!((0..i16::try_from(WIDTH).unwrap()).contains(&x));
                assert!((0..i16::try_from(HEIGHT).unwrap()).contains(&y));
            }
        }

        #[test]
        fn clear_resets_the_stack_and_spawns() {
            let mut board = board();
            fill_row(&mut board, HEIGHT - 1);
            board.hard_drop();

            board.clear();
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    assert_eq!(board.cell(x, y), None);
                }
            }
            assert_eq!(board.falling_piece().cells().len(), 4);
        }
    }

    mod editing {
        use super::*;

        #[test]
        fn toggle_flips_a_cell() {
            let mut board = board();
            board.toggle_cell(4, 10, PieceKind::L);
            assert_eq!(board.cell(4, 10), Some(PieceKind::L));
            board.toggle_cell(4, 10, PieceKind::L);
            assert_eq!(board.cell(4, 10), None);
        }

        #[test]
        fn wipe_empties_the_stack() {
            let mut board = board();
            fill_row(&mut board, HEIGHT - 1);
            board.wipe();
            assert_eq!(board.cell(0, HEIGHT - 1), None);
        }
    }
}
