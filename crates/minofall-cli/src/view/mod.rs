pub use self::widgets::{BoardDisplay, StatsDisplay};

mod widgets;

use std::{io, thread, time::Duration};

use minofall_board::{GridBoard, HEIGHT};
use minofall_engine::{GameStats, Mode, View};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

// 10 board cells at 2 characters each, plus the border.
const BOARD_PANEL_WIDTH: u16 = 22;
const STATS_PANEL_WIDTH: u16 = 24;

const ANIMATION_FRAME: Duration = Duration::from_millis(25);

/// Full-screen terminal renderer for the game.
pub struct TerminalView {
    terminal: DefaultTerminal,
}

impl TerminalView {
    pub fn new(terminal: DefaultTerminal) -> Self {
        Self { terminal }
    }

    fn draw(
        &mut self,
        board: &GridBoard,
        stats: &GameStats,
        mode: Mode,
        flooded_rows: usize,
    ) -> io::Result<()> {
        self.terminal
            .draw(|frame| render(frame, board, stats, mode, flooded_rows))?;
        Ok(())
    }
}

impl View<GridBoard> for TerminalView {
    fn refresh_screen(&mut self, board: &GridBoard, stats: &GameStats, mode: Mode) -> io::Result<()> {
        self.draw(board, stats, mode, 0)
    }

    /// Floods the board red from the bottom up, one row per frame.
    fn show_game_over_animation(&mut self, board: &GridBoard, stats: &GameStats) -> io::Result<()> {
        for flooded in 1..=HEIGHT {
            self.draw(board, stats, Mode::GameOver, flooded)?;
            thread::sleep(ANIMATION_FRAME);
        }
        Ok(())
    }
}

fn render(frame: &mut Frame, board: &GridBoard, stats: &GameStats, mode: Mode, flooded_rows: usize) {
    let help = Text::from(help_text(mode))
        .style(Style::default().fg(Color::DarkGray))
        .centered();

    let [main_area, help_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
    let [board_area, stats_area] = Layout::horizontal([
        Constraint::Length(BOARD_PANEL_WIDTH),
        Constraint::Length(STATS_PANEL_WIDTH),
    ])
    .areas(main_area);

    frame.render_widget(BoardDisplay::new(board).flooded_rows(flooded_rows), board_area);
    frame.render_widget(StatsDisplay::new(board, stats, mode), stats_area);
    frame.render_widget(help, help_area);
}

fn help_text(mode: Mode) -> &'static str {
    match mode {
        Mode::Running | Mode::RunningWithAi => {
            "← → (move) | ↓ (soft drop) | ↑ (hard drop) | z x (rotate) | p (pause) | a (ai) | e (edit) | q (quit)"
        }
        Mode::Paused => "p (resume) | n (new game) | a (ai) | q (quit)",
        Mode::GameOver => "n (new game) | a (ai) | e (edit) | b (preview) | q (quit)",
        Mode::Preview => "e (edit) | q (quit)",
        Mode::Edit => "arrows (cursor) | space (toggle) | b (brush) | c (wipe) | esc (done)",
        Mode::Stopped => "",
    }
}
