use minofall_engine::{Editor, Key};

use crate::{
    board::{GridBoard, HEIGHT, WIDTH},
    piece::PieceKind,
};

/// Cursor-driven board editor.
///
/// Arrow keys move the cursor, space or enter toggles the cell under it
/// with the current brush, `b` cycles the brush kind, and `c` wipes the
/// stack. The cursor position is mirrored into the board so the view can
/// draw it.
#[derive(Debug)]
pub struct GridEditor {
    cursor: (usize, usize),
    brush: PieceKind,
}

impl Default for GridEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl GridEditor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: (WIDTH / 2, HEIGHT / 2),
            brush: PieceKind::L,
        }
    }

    fn cycle_brush(&mut self) {
        let index = PieceKind::ALL
            .iter()
            .position(|&kind| kind == self.brush)
            .unwrap_or(0);
        self.brush = PieceKind::ALL[(index + 1) % PieceKind::ALL.len()];
    }
}

impl Editor<GridBoard> for GridEditor {
    fn enter(&mut self, board: &mut GridBoard) {
        board.set_cursor(Some(self.cursor));
    }

    fn leave(&mut self, board: &mut GridBoard) {
        board.set_cursor(None);
    }

    fn handle_key(&mut self, board: &mut GridBoard, key: Key) {
        let (x, y) = self.cursor;
        match key {
            Key::Left => self.cursor.0 = x.saturating_sub(1),
            Key::Right => self.cursor.0 = (x + 1).min(WIDTH - 1),
            Key::Up => self.cursor.1 = y.saturating_sub(1),
            Key::Down => self.cursor.1 = (y + 1).min(HEIGHT - 1),
            Key::Char(' ') | Key::Enter => board.toggle_cell(x, y, self.brush),
            Key::Char('b') => self.cycle_brush(),
            Key::Char('c') => board.wipe(),
            _ => {}
        }
        board.set_cursor(Some(self.cursor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_moves_and_stays_in_bounds() {
        let mut editor = GridEditor::new();
        let mut board = GridBoard::with_seed(1);
        editor.enter(&mut board);

        for _ in 0..WIDTH * 2 {
            editor.handle_key(&mut board, Key::Left);
        }
        assert_eq!(board.cursor(), Some((0, HEIGHT / 2)));

        for _ in 0..HEIGHT * 2 {
            editor.handle_key(&mut board, Key::Down);
        }
        assert_eq!(board.cursor(), Some((0, HEIGHT - 1)));
    }

    #[test]
    fn space_toggles_the_cell_under_the_cursor() {
        let mut editor = GridEditor::new();
        let mut board = GridBoard::with_seed(1);
        editor.enter(&mut board);

        let (x, y) = board.cursor().unwrap();
        editor.handle_key(&mut board, Key::Char(' '));
        assert!(board.cell(x, y).is_some());
        editor.handle_key(&mut board, Key::Char(' '));
        assert!(board.cell(x, y).is_none());
    }

    #[test]
    fn leave_hides_the_cursor() {
        let mut editor = GridEditor::new();
        let mut board = GridBoard::with_seed(1);
        editor.enter(&mut board);
        assert!(board.cursor().is_some());
        editor.leave(&mut board);
        assert!(board.cursor().is_none());
    }

    #[test]
    fn wipe_clears_every_settled_cell() {
        let mut editor = GridEditor::new();
        let mut board = GridBoard::with_seed(1);
        editor.enter(&mut board);

        editor.handle_key(&mut board, Key::Char(' '));
        editor.handle_key(&mut board, Key::Char('c'));
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                assert_eq!(board.cell(x, y), None);
            }
        }
    }
}
