//! Pacing module - warm-up progress of a session
//!
//! The session starts generous: pieces are picked against a high contact-score threshold
//! that decays linearly to a floor as the move count approaches the warm-up target.
//! Clearing lines and reviving push the target further out.

use crate::config::SpawnerConfig;
use crate::rng::SpawnRng;
use crate::types::REWARD_MOVES_PER_LINE;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionPacing {
    moves_played: u32,
    target_warmup_moves: u32,
    start_threshold: f32,
    min_threshold: f32,
    reward_moves_per_line: u32,
}

impl SessionPacing {
    /// Sample the start threshold and warm-up target for a new session
    pub fn new(config: &SpawnerConfig, rng: &mut SpawnRng) -> Self {
        Self {
            moves_played: 0,
            target_warmup_moves: rng.range_u32(config.warmup_moves_range),
            start_threshold: rng.range_f32(config.start_threshold_range),
            min_threshold: config.min_threshold,
            reward_moves_per_line: config.reward_moves_per_line,
        }
    }

    /// Pacing with fixed values, for tools and tests.
    ///
    /// Line clears extend warm-up by the default reward; see
    /// [`with_reward_per_line`](Self::with_reward_per_line).
    pub fn with_values(
        moves_played: u32,
        target_warmup_moves: u32,
        start_threshold: f32,
        min_threshold: f32,
    ) -> Self {
        Self {
            moves_played,
            target_warmup_moves,
            start_threshold,
            min_threshold,
            reward_moves_per_line: REWARD_MOVES_PER_LINE,
        }
    }

    pub fn with_reward_per_line(mut self, moves: u32) -> Self {
        self.reward_moves_per_line = moves;
        self
    }

    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    pub fn target_warmup_moves(&self) -> u32 {
        self.target_warmup_moves
    }

    pub fn start_threshold(&self) -> f32 {
        self.start_threshold
    }

    pub fn in_warmup(&self) -> bool {
        self.moves_played < self.target_warmup_moves
    }

    /// Progress through warm-up in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.target_warmup_moves == 0 {
            return 1.0;
        }
        (self.moves_played as f32 / self.target_warmup_moves as f32).min(1.0)
    }

    /// Threshold decayed linearly from the start value to the floor.
    ///
    /// Exactly the floor once the warm-up target is reached.
    pub fn dynamic_threshold(&self) -> f32 {
        if !self.in_warmup() {
            return self.min_threshold;
        }
        let t = self.progress();
        self.start_threshold + (self.min_threshold - self.start_threshold) * t
    }

    /// Called once per spawn round
    pub fn register_round(&mut self) {
        self.moves_played = self.moves_played.saturating_add(1);
    }

    /// Extend warm-up by the reward for `lines` cleared lines
    pub fn on_lines_cleared(&mut self, lines: u32) {
        self.target_warmup_moves = self
            .target_warmup_moves
            .saturating_add(lines.saturating_mul(self.reward_moves_per_line));
    }

    /// Restart warm-up `bonus_moves` past the current move count
    pub fn on_revive(&mut self, bonus_moves: u32) {
        self.target_warmup_moves = self.moves_played.saturating_add(bonus_moves);
    }
}
