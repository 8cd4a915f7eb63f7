use std::time::Duration;

/// Base score for a normal lock, indexed by lines cleared at once.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Base score for a T-spin lock, indexed by lines cleared at once.
/// Index 0 is the line-less T-spin ("mini"). A 4-line T-spin cannot occur
/// without wall kicks; the lookup just falls through to 0.
const T_SPIN_SCORE_TABLE: [usize; 4] = [400, 800, 1200, 1600];

/// Score, line, and level bookkeeping for one session.
///
/// The level starts at 1 and advances whenever the cumulative line count
/// crosses a multiple of 10; every award is multiplied by the level at the
/// time of the clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    lines: usize,
    level: usize,
    pieces: usize,
    clear_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
            pieces: 0,
            clear_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Total lines cleared this session.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Total pieces locked this session.
    #[must_use]
    pub const fn pieces(&self) -> usize {
        self.pieces
    }

    /// Histogram of locks by lines cleared at once: `[0]` counts locks that
    /// cleared nothing, `[1]` singles, up to `[4]` quads.
    #[must_use]
    pub const fn clear_counter(&self) -> &[usize; 5] {
        &self.clear_counter
    }

    /// Time per automatic drop step at the current level: 1.0 s at level 1,
    /// shrinking 0.05 s per level, floored at 0.1 s.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        let millis = 100 + u64::saturating_sub(900, (self.level as u64 - 1) * 50);
        Duration::from_millis(millis)
    }

    /// Records a locked piece and its cleared lines; returns the score
    /// awarded. T-spins score from their own table, including with zero
    /// lines. Advances the level (at most once) when the line total crosses
    /// a multiple of 10.
    pub fn record_lock(&mut self, cleared: usize, t_spin: bool) -> usize {
        self.pieces += 1;
        if cleared < self.clear_counter.len() {
            self.clear_counter[cleared] += 1;
        }
        if cleared == 0 && !t_spin {
            return 0;
        }

        self.lines += cleared;
        let base = if t_spin {
            T_SPIN_SCORE_TABLE.get(cleared).copied().unwrap_or(0)
        } else {
            SCORE_TABLE.get(cleared).copied().unwrap_or(0)
        };
        let awarded = base * self.level;
        self.score += awarded;

        if self.lines / 10 >= self.level {
            self.level += 1;
        }
        awarded
    }
}
