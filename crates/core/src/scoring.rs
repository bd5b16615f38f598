//! Scoring module - placement points, clear points and the combo multiplier
//!
//! Rules:
//! - Placing a piece scores 1 point per placed cell.
//! - A clear scores `cleared_cells * points_per_cleared_cell * multiplier`, plus
//!   `(lines - 1) * multi_line_bonus * multiplier` when two or more lines go at once.
//! - After a clear the multiplier steps up (to `max_multiplier` at most) and the
//!   moves-since-clear counter resets.
//! - A placement without a clear bumps moves-since-clear; once it exceeds
//!   `combo_tolerance` the multiplier falls back to 1.

use crate::config::ScoringConfig;

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points for the placed cells
    pub placement_score: u32,
    /// Points for cleared cells and extra lines, multiplier applied
    pub clear_score: u32,
    pub total: u32,
    /// Multiplier used for this clear
    pub multiplier: u32,
}

/// Calculate clear points for a single placement
pub fn calculate_clear_score(
    config: &ScoringConfig,
    cleared_cells: u32,
    lines: u32,
    multiplier: u32,
) -> u32 {
    if lines == 0 {
        return 0;
    }
    let base = cleared_cells.saturating_mul(config.points_per_cleared_cell);
    let bonus = (lines - 1).saturating_mul(config.multi_line_bonus);
    base.saturating_add(bonus).saturating_mul(multiplier.max(1))
}

/// Combo state and running score of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreManager {
    config: ScoringConfig,
    score: u64,
    best_score: u64,
    multiplier: u32,
    moves_since_clear: u32,
}

impl ScoreManager {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            score: 0,
            best_score: 0,
            multiplier: 1,
            moves_since_clear: 0,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Highest score reached since this manager was created
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn moves_since_clear(&self) -> u32 {
        self.moves_since_clear
    }

    /// Account for one placement and the clear it caused (0 lines for no clear)
    pub fn register_placement(&mut self, placed_cells: u32, cleared_cells: u32, lines: u32) -> ScoreResult {
        let multiplier = self.multiplier;
        let clear_score = calculate_clear_score(&self.config, cleared_cells, lines, multiplier);

        if lines > 0 {
            self.multiplier = (self.multiplier + 1).min(self.config.max_multiplier.max(1));
            self.moves_since_clear = 0;
        } else {
            self.moves_since_clear = self.moves_since_clear.saturating_add(1);
            if self.moves_since_clear > self.config.combo_tolerance {
                self.multiplier = 1;
            }
        }

        let total = placed_cells.saturating_add(clear_score);
        self.score = self.score.saturating_add(total as u64);
        self.best_score = self.best_score.max(self.score);

        ScoreResult {
            placement_score: placed_cells,
            clear_score,
            total,
            multiplier,
        }
    }

    /// Start a new game. The best score is kept.
    pub fn reset(&mut self) {
        self.score = 0;
        self.multiplier = 1;
        self.moves_since_clear = 0;
    }
}

impl Default for ScoreManager {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_score() {
        let config = ScoringConfig::default();
        assert_eq!(calculate_clear_score(&config, 0, 0, 3), 0);
        assert_eq!(calculate_clear_score(&config, 8, 1, 1), 80);
        // 15 cells, 2 lines: 150 + 20
        assert_eq!(calculate_clear_score(&config, 15, 2, 1), 170);
        assert_eq!(calculate_clear_score(&config, 15, 2, 2), 340);
    }

    #[test]
    fn test_combo_builds_and_resets() {
        let mut sm = ScoreManager::default();

        let r = sm.register_placement(4, 8, 1);
        assert_eq!(r.multiplier, 1);
        assert_eq!(r.total, 84);
        assert_eq!(sm.multiplier(), 2);

        let r = sm.register_placement(2, 8, 1);
        assert_eq!(r.multiplier, 2);
        assert_eq!(r.clear_score, 160);
        assert_eq!(sm.multiplier(), 3);

        // Three misses are tolerated, the fourth resets.
        for _ in 0..3 {
            sm.register_placement(1, 0, 0);
            assert_eq!(sm.multiplier(), 3);
        }
        sm.register_placement(1, 0, 0);
        assert_eq!(sm.multiplier(), 1);
        assert_eq!(sm.moves_since_clear(), 4);
    }

    #[test]
    fn test_multiplier_capped() {
        let config = ScoringConfig {
            max_multiplier: 3,
            ..ScoringConfig::default()
        };
        let mut sm = ScoreManager::new(config);
        for _ in 0..10 {
            sm.register_placement(1, 8, 1);
        }
        assert_eq!(sm.multiplier(), 3);
    }

    #[test]
    fn test_reset_keeps_best() {
        let mut sm = ScoreManager::default();
        sm.register_placement(5, 8, 1);
        let best = sm.score();
        sm.reset();
        assert_eq!(sm.score(), 0);
        assert_eq!(sm.multiplier(), 1);
        assert_eq!(sm.best_score(), best);
    }

    #[test]
    fn test_reset_before_any_best_matches_fresh() {
        let mut sm = ScoreManager::default();
        sm.register_placement(0, 0, 0);
        sm.reset();
        assert_eq!(sm, ScoreManager::default());
    }
}
