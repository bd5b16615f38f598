//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains every rule of the block-blast puzzle: the grid, shapes, placement and
//! line clearing, the heuristics that judge shapes against a grid, the spawner that deals
//! batches, pacing, scoring, and the [`GameSession`] that ties them together.
//! It has no dependencies on rendering, input or I/O.
//!
//! # Module Structure
//!
//! - [`grid`]: flat row-major occupancy grid
//! - [`shape`]: [`ShapeMatrix`] with trimming and clockwise rotation
//! - [`placement`]: placement validation, commit, line detection and clearing on [`Grid`]
//! - [`finder`]: [`ShapeFinder`] heuristics (mega killers, perfect fits, full-clear rescue)
//! - [`library`]: built-in and JSON-authored shape sets
//! - [`pacing`]: warm-up target and dynamic threshold
//! - [`spawner`]: mode state machine and batch assembly
//! - [`scoring`]: points and combo multiplier
//! - [`session`]: the external interface consumed by a presentation layer
//! - [`layout`]: world/cell coordinate mapping for presentation
//!
//! # Rules
//!
//! - Pieces are offered in batches (three by default) and placed in any order.
//! - A placement is legal when every covered cell is inside the grid and free.
//! - After each placement every full row and column is detected first, then cleared at once.
//! - The game ends when no unplaced piece fits anywhere, unless a revive credit remains.
//!
//! # Example
//!
//! ```
//! use block_blast_core::GameSession;
//! use block_blast_types::SessionStatus;
//!
//! let mut session = GameSession::with_standard(12345);
//! session.mark_ready().unwrap();
//!
//! let (slot, shape) = session.remaining_shapes().next().unwrap();
//! let matrix = session.library().matrix(shape).unwrap();
//! let (x, y) = session.grid().valid_origins(matrix).next().unwrap();
//! session.place_slot(slot, x, y).unwrap();
//!
//! assert!(session.score() > 0);
//! assert_eq!(session.status(), SessionStatus::Playing);
//! ```
//!
//! Same seed and configuration always deal the same batches.

pub mod config;
pub mod error;
pub mod finder;
pub mod grid;
pub mod layout;
pub mod library;
pub mod pacing;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shape;
pub mod snapshot;
pub mod spawner;

pub use block_blast_types as types;

// Re-export commonly used types for convenience
pub use config::{GameConfig, GridConfig, ReviveConfig, ScoringConfig, SpawnerConfig};
pub use error::{ConfigError, ShapeError, SpawnError};
pub use finder::ShapeFinder;
pub use grid::Grid;
pub use layout::CellLayout;
pub use library::{ShapeDef, ShapeLibrary, ShapeSpec};
pub use pacing::SessionPacing;
pub use placement::{LineClear, SimulatedPlacement};
pub use rng::SpawnRng;
pub use scoring::{calculate_clear_score, ScoreManager, ScoreResult};
pub use session::{GameSession, PlaceError, PlaceOutcome, SessionError};
pub use shape::ShapeMatrix;
pub use snapshot::GameSnapshot;
pub use spawner::{SpawnBatch, Spawner};
