use minofall_board::{GridBoard, HEIGHT, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// The playfield rendered as two terminal cells per board cell.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a GridBoard,
    flooded_rows: usize,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a GridBoard) -> Self {
        Self {
            board,
            flooded_rows: 0,
        }
    }

    /// Floods the bottom `rows` rows, used by the game-over sweep.
    pub fn flooded_rows(self, rows: usize) -> Self {
        Self {
            flooded_rows: rows,
            ..self
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered();
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = self.board.render_rows();
        let cursor = self.board.cursor();

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .map(|(y, row)| {
                let spans: Vec<Span> = row
                    .iter()
                    .enumerate()
                    .map(|(x, cell)| {
                        if y >= HEIGHT - self.flooded_rows.min(HEIGHT) {
                            Span::styled("██", Style::default().fg(Color::Red))
                        } else if cursor == Some((x, y)) {
                            Span::styled("[]", Style::default().fg(Color::Yellow))
                        } else {
                            match cell {
                                Some(kind) => {
                                    Span::styled("██", Style::default().fg(kind_color(*kind)))
                                }
                                None => Span::raw("  "),
                            }
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

fn kind_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::S => Color::Green,
        PieceKind::Z => Color::Red,
        PieceKind::J => Color::Blue,
        PieceKind::L => Color::LightRed,
        PieceKind::T => Color::Magenta,
    }
}
