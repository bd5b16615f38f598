//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no game logic, making them usable in any
//! context (core rules, autoplay drivers, presentation layers).
//!
//! # Grid Dimensions
//!
//! The classic playfield is an 8x8 square grid:
//!
//! - **Width**: 8 columns (indexed 0-7, left to right)
//! - **Height**: 8 rows (indexed 0-7, top to bottom)
//! - **Slots**: 3 pieces are offered per batch
//!
//! # Spawn Tuning Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `CRITICAL_FILL` | 0.85 | Fill above which the spawner switches to easy pieces |
//! | `RELAX_FILL` | 0.15 | Fill below which any fitting piece is offered |
//! | `SMART_HELP_FILL` | 0.5 | Fill above which hole fillers are preferred |
//! | `SMART_HELP_HOLE_THRESHOLD` | 0.7 | Contact score required in smart-help mode |
//! | `START_THRESHOLD_RANGE` | 0.85..0.95 | Session start value of the dynamic threshold |
//! | `MIN_THRESHOLD` | 0.45 | Floor of the dynamic threshold |
//! | `HOLE_FILLER_OFFSET` | 0.15 | Hole fillers use `dynamic - offset` |
//! | `REWARD_MOVES_PER_LINE` | 2 | Warm-up extension per cleared line |
//! | `REVIVE_BONUS_MOVES` | 20 | Warm-up extension granted by a revive |
//!
//! # Examples
//!
//! ```
//! use block_blast_types::{SpawnerMode, ColorTag, DEFAULT_GRID_WIDTH};
//!
//! let mode = SpawnerMode::from_str("smartHelp").unwrap();
//! assert_eq!(mode, SpawnerMode::SmartHelp);
//! assert_eq!(mode.as_str(), "smartHelp");
//!
//! assert_eq!(ColorTag(3).get(), 3);
//! assert_eq!(DEFAULT_GRID_WIDTH, 8);
//! ```

use serde::{Deserialize, Serialize};

/// Grid width in cells (8 columns)
pub const DEFAULT_GRID_WIDTH: u8 = 8;

/// Grid height in cells (8 rows)
pub const DEFAULT_GRID_HEIGHT: u8 = 8;

/// Largest grid edge accepted by configuration
pub const MAX_GRID_EDGE: u8 = 32;

/// Number of pieces offered per batch
pub const DEFAULT_SLOT_COUNT: u8 = 3;

/// Fill fraction above which the grid is considered in danger
pub const CRITICAL_FILL: f32 = 0.85;

/// Fill fraction below which the spawner relaxes
pub const RELAX_FILL: f32 = 0.15;

/// Fill fraction above which the spawner offers hole fillers
pub const SMART_HELP_FILL: f32 = 0.5;

/// Contact score a hole filler must reach in smart-help mode
pub const SMART_HELP_HOLE_THRESHOLD: f32 = 0.7;

/// Inclusive range the session start threshold is sampled from
pub const START_THRESHOLD_RANGE: (f32, f32) = (0.85, 0.95);

/// Floor the dynamic threshold decays to
pub const MIN_THRESHOLD: f32 = 0.45;

/// Hole fillers in the layered fallback use `dynamic_threshold - HOLE_FILLER_OFFSET`
pub const HOLE_FILLER_OFFSET: f32 = 0.15;

/// Inclusive range the warm-up move target is sampled from
pub const WARMUP_MOVES_RANGE: (u32, u32) = (12, 20);

/// Warm-up moves added per cleared line
pub const REWARD_MOVES_PER_LINE: u32 = 2;

/// Warm-up moves granted past the current move count on revive
pub const REVIVE_BONUS_MOVES: u32 = 20;

/// Revives available per session
pub const DEFAULT_REVIVE_CREDITS: u8 = 1;

/// Minimum cell mass for the "large shape" heuristics
pub const LARGE_SHAPE_MIN_MASS: usize = 4;

/// Simultaneous lines that make a placement a mega kill
pub const MEGA_KILL_MIN_LINES: usize = 3;

/// Shapes up to this mass form the easy pool when no shape is flagged easy
pub const EASY_MAX_MASS: usize = 3;

/// Contact weight of a shape edge touching the grid wall
pub const WALL_CONTACT_WEIGHT: f32 = 0.35;

/// Contact weight of a shape edge touching an occupied cell
pub const BLOCK_CONTACT_WEIGHT: f32 = 1.0;

/// Scores within this distance of the best are treated as ties
pub const SCORE_TIE_EPSILON: f32 = 0.01;

/// Points per cleared cell at multiplier 1
pub const POINTS_PER_CLEARED_CELL: u32 = 10;

/// Extra points per additional line in a multi-line clear at multiplier 1
pub const MULTI_LINE_BONUS: u32 = 20;

/// Non-clearing moves tolerated before the multiplier resets
pub const COMBO_TOLERANCE: u32 = 3;

/// Multiplier ceiling
pub const MAX_MULTIPLIER: u32 = 10;


/// Color tag attached to an occupied cell
///
/// The tag is opaque to the core; presentation maps it to a palette entry.
/// Snapshots encode empty cells as 0, so tags are expected to be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTag(pub u8);

impl ColorTag {
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Index of a shape in the session's shape library
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u16);

impl ShapeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell
/// - `Some(ColorTag)`: Occupied cell carrying the visual tag it was placed with
pub type Cell = Option<ColorTag>;

/// Difficulty modes of the spawner
///
/// The mode is re-classified every round from grid fill and session pacing.
/// Any mode may follow any other.
///
/// - **None**: Before the first round of a session
/// - **Relax**: Nearly empty grid, any fitting piece
/// - **WarmUp**: Early session, generous layered selection
/// - **Critical**: Nearly full grid, small pieces only
/// - **SmartHelp**: Busy grid, pieces that nestle into existing terrain
/// - **SkillBased**: Everything else, layered selection at the decayed threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpawnerMode {
    #[default]
    None,
    Relax,
    WarmUp,
    Critical,
    SmartHelp,
    SkillBased,
}

impl SpawnerMode {
    pub const ALL: [SpawnerMode; 6] = [
        SpawnerMode::None,
        SpawnerMode::Relax,
        SpawnerMode::WarmUp,
        SpawnerMode::Critical,
        SpawnerMode::SmartHelp,
        SpawnerMode::SkillBased,
    ];

    /// Parse mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(SpawnerMode::None),
            "relax" => Some(SpawnerMode::Relax),
            "warmup" => Some(SpawnerMode::WarmUp),
            "critical" => Some(SpawnerMode::Critical),
            "smarthelp" => Some(SpawnerMode::SmartHelp),
            "skillbased" => Some(SpawnerMode::SkillBased),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnerMode::None => "none",
            SpawnerMode::Relax => "relax",
            SpawnerMode::WarmUp => "warmUp",
            SpawnerMode::Critical => "critical",
            SpawnerMode::SmartHelp => "smartHelp",
            SpawnerMode::SkillBased => "skillBased",
        }
    }
}

/// Lifecycle of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    /// Constructed, waiting for the presentation layer to confirm it is ready
    #[default]
    Initializing,
    Playing,
    /// No unplaced piece fits; a revive may be accepted or declined
    AwaitingRevive,
    GameOver,
}

/// Core-side events, drained by presentation after each call into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CoreEvent {
    /// The session accepted `mark_ready` and spawned its first batch
    Ready,
    CellOccupied {
        x: u8,
        y: u8,
        color: ColorTag,
    },
    CellCleared {
        x: u8,
        y: u8,
    },
    LinesCleared {
        cleared_cells: u32,
        lines: u32,
    },
    ScoreChanged {
        score: u64,
        multiplier: u32,
    },
    BatchSpawned {
        mode: SpawnerMode,
        rescue: bool,
    },
    ReviveOffered,
    GameOver,
}
