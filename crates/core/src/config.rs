//! Config module - tunables of a session
//!
//! Every field has a default matching the constants in [`crate::types`]; a JSON document
//! only needs to name the values it overrides:
//!
//! ```
//! use block_blast_core::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "grid": { "width": 10, "height": 10 } }"#).unwrap();
//! assert_eq!(config.grid.width, 10);
//! assert_eq!(config.spawner.slot_count, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub spawner: SpawnerConfig,
    pub scoring: ScoringConfig,
    pub revive: ReviveConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: u8,
    pub height: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub slot_count: u8,
    pub critical_fill: f32,
    pub relax_fill: f32,
    pub smart_help_fill: f32,
    pub smart_help_hole_threshold: f32,
    pub start_threshold_range: (f32, f32),
    pub min_threshold: f32,
    pub hole_filler_offset: f32,
    pub warmup_moves_range: (u32, u32),
    pub reward_moves_per_line: u32,
    pub easy_max_mass: usize,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            critical_fill: CRITICAL_FILL,
            relax_fill: RELAX_FILL,
            smart_help_fill: SMART_HELP_FILL,
            smart_help_hole_threshold: SMART_HELP_HOLE_THRESHOLD,
            start_threshold_range: START_THRESHOLD_RANGE,
            min_threshold: MIN_THRESHOLD,
            hole_filler_offset: HOLE_FILLER_OFFSET,
            warmup_moves_range: WARMUP_MOVES_RANGE,
            reward_moves_per_line: REWARD_MOVES_PER_LINE,
            easy_max_mass: EASY_MAX_MASS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub points_per_cleared_cell: u32,
    pub multi_line_bonus: u32,
    pub combo_tolerance: u32,
    pub max_multiplier: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_cleared_cell: POINTS_PER_CLEARED_CELL,
            multi_line_bonus: MULTI_LINE_BONUS,
            combo_tolerance: COMBO_TOLERANCE,
            max_multiplier: MAX_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviveConfig {
    pub credits: u8,
    pub bonus_moves: u32,
}

impl Default for ReviveConfig {
    fn default() -> Self {
        Self {
            credits: DEFAULT_REVIVE_CREDITS,
            bonus_moves: REVIVE_BONUS_MOVES,
        }
    }
}

impl GameConfig {
    /// Parse and validate
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridConfig { width, height } = self.grid;
        if !(1..=MAX_GRID_EDGE).contains(&width) || !(1..=MAX_GRID_EDGE).contains(&height) {
            return Err(ConfigError::InvalidGridSize {
                width,
                height,
                max: MAX_GRID_EDGE,
            });
        }

        let s = &self.spawner;
        if s.slot_count == 0 {
            return Err(ConfigError::NoSlots);
        }
        for (name, value) in [
            ("critical_fill", s.critical_fill),
            ("relax_fill", s.relax_fill),
            ("smart_help_fill", s.smart_help_fill),
            ("smart_help_hole_threshold", s.smart_help_hole_threshold),
            ("start_threshold_range.0", s.start_threshold_range.0),
            ("start_threshold_range.1", s.start_threshold_range.1),
            ("min_threshold", s.min_threshold),
            ("hole_filler_offset", s.hole_filler_offset),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        let (lo, hi) = s.start_threshold_range;
        if lo > hi {
            return Err(ConfigError::InvertedRange {
                name: "start_threshold_range",
                min: lo as f64,
                max: hi as f64,
            });
        }
        let (lo, hi) = s.warmup_moves_range;
        if lo > hi {
            return Err(ConfigError::InvertedRange {
                name: "warmup_moves_range",
                min: lo as f64,
                max: hi as f64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.width, 8);
        assert_eq!(config.spawner.critical_fill, 0.85);
        assert_eq!(config.revive.bonus_moves, 20);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            GameConfig::from_json_str(r#"{ "spawner": { "slot_count": 4 }, "revive": { "credits": 0 } }"#)
                .unwrap();
        assert_eq!(config.spawner.slot_count, 4);
        assert_eq!(config.spawner.min_threshold, MIN_THRESHOLD);
        assert_eq!(config.revive.credits, 0);
        assert_eq!(config.revive.bonus_moves, REVIVE_BONUS_MOVES);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GameConfig::from_json_str(r#"{ "grid": { "width": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGridSize { .. }));

        let err = GameConfig::from_json_str(r#"{ "spawner": { "slot_count": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoSlots));

        let err =
            GameConfig::from_json_str(r#"{ "spawner": { "critical_fill": 1.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ThresholdOutOfRange {
                name: "critical_fill",
                ..
            }
        ));

        let err = GameConfig::from_json_str(r#"{ "spawner": { "warmup_moves_range": [30, 10] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedRange { .. }));

        assert!(matches!(
            GameConfig::from_json_str("{").unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }
}
