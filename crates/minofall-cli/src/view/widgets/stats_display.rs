use minofall_board::GridBoard;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Paragraph, Widget},
};

use minofall_engine::{GameStats, Mode};

/// Score, level, line count, upcoming pieces, and the current mode.
#[derive(Debug)]
pub struct StatsDisplay<'a> {
    board: &'a GridBoard,
    stats: &'a GameStats,
    mode: Mode,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(board: &'a GridBoard, stats: &'a GameStats, mode: Mode) -> Self {
        Self { board, stats, mode }
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("minofall");
        let inner = block.inner(area);
        block.render(area, buf);

        let next: String = self
            .board
            .next_pieces()
            .take(3)
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let lines = vec![
            Line::from(format!("score {:>8}", self.stats.score())),
            Line::from(format!("level {:>8}", self.stats.level())),
            Line::from(format!("lines {:>8}", self.stats.cleared_lines())),
            Line::from(""),
            Line::from(format!("next  {next:>8}")),
            Line::from(""),
            Line::styled(mode_label(self.mode), mode_style(self.mode)),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::GameOver => "game over",
        Mode::Running => "running",
        Mode::RunningWithAi => "running (ai)",
        Mode::Paused => "paused",
        Mode::Preview => "preview",
        Mode::Edit => "edit",
        Mode::Stopped => "stopped",
    }
}

fn mode_style(mode: Mode) -> Style {
    let color = match mode {
        Mode::Running => Color::White,
        Mode::RunningWithAi => Color::Magenta,
        Mode::Paused => Color::Yellow,
        Mode::GameOver | Mode::Stopped => Color::Red,
        Mode::Preview | Mode::Edit => Color::Cyan,
    };
    Style::default().fg(color)
}
