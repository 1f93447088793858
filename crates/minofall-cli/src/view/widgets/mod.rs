pub use self::{board_display::BoardDisplay, stats_display::StatsDisplay};

mod board_display;
mod stats_display;
