use std::time::Duration;

const MAX_SCORE: u64 = 9_999_999;
const MAX_CLEARED_LINES: u32 = 999_999;
const MAX_LEVEL: u32 = 30;

/// Gravity period of a fresh game (level 1).
pub const INITIAL_TICK_TIME: Duration = Duration::from_millis(480);

/// Placeholder gravity period before the first game starts.
///
/// The tick timer is never armed with this value; it only keeps
/// `tick_time` well-defined between engine creation and the first
/// `NewGame`.
pub const IDLE_TICK_TIME: Duration = Duration::from_secs(60 * 60);

/// Score, level, and line counters of the current game, plus the gravity
/// period derived from the level.
///
/// Score saturates at 9,999,999 and the line counter at 999,999; both are
/// clamping policies, not error conditions. The level never decreases
/// within a game and is capped at 30. `tick_time` is recomputed from the
/// level on every level-up and is never mutated independently; a new
/// period takes effect the next time a timer is armed with it.
#[derive(Debug, Clone)]
pub struct GameStats {
    score: u64,
    level: u32,
    cleared_lines: u32,
    tick_time: Duration,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates the pre-game state: all counters zero, idle gravity period.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            cleared_lines: 0,
            tick_time: IDLE_TICK_TIME,
        }
    }

    /// Resets the counters for a new game.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 1;
        self.cleared_lines = 0;
        self.tick_time = INITIAL_TICK_TIME;
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> u32 {
        self.cleared_lines
    }

    /// The current gravity period.
    #[must_use]
    pub const fn tick_time(&self) -> Duration {
        self.tick_time
    }

    /// Records `lines` cleared by one piece lock.
    ///
    /// Adds to the line counter and the score, then checks for a level-up.
    /// At most one level-up happens per call, even when the lock crosses
    /// several ten-line thresholds at once; later calls catch up on their
    /// own.
    pub fn add_cleared_lines(&mut self, lines: u32) {
        self.cleared_lines = self.cleared_lines.saturating_add(lines).min(MAX_CLEARED_LINES);

        self.add_score(line_points(lines) * u64::from(self.level + 1));

        if self.level < self.cleared_lines / 10 {
            self.level_up();
        }
    }

    /// Adds to the score, saturating at the display maximum.
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points).min(MAX_SCORE);
    }

    fn level_up(&mut self) {
        if self.level >= MAX_LEVEL {
            return;
        }
        self.level += 1;
        self.tick_time = tick_time_for_level(self.level);
    }
}

/// Points for clearing n lines at once, before the `level + 1` factor.
/// Any other count is worth nothing.
const fn line_points(lines: u32) -> u64 {
    match lines {
        1 => 40,
        2 => 100,
        3 => 300,
        4 => 1200,
        _ => 0,
    }
}

/// Gravity period for a level, as a step function.
///
/// Produces the classic decreasing speed curve: 480 ms at level 1 down to
/// 10 ms at level 30.
#[must_use]
pub fn tick_time_for_level(level: u32) -> Duration {
    let millis = match level {
        30.. => 10,
        26..=29 => 20,
        // 50 down to 30
        20..=25 => u64::from(10 * (15 - level / 2)),
        // 150 down to 60
        10..=19 => u64::from(10 * (25 - level)),
        // 480 down to 160
        _ => u64::from(10 * (52 - 4 * level)),
    };
    Duration::from_millis(millis)
}
