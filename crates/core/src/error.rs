//! Error types for configuration, shape authoring and batch assembly.
//!
//! Placement failures are not errors at this level: they are expected races between
//! drag state and grid state and are reported as `false` / [`PlaceError`](crate::session::PlaceError).

use thiserror::Error;

/// Problems parsing an authored shape
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("shape has no rows")]
    NoRows,
    #[error("row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unexpected character {ch:?} in row {row} (use '#' or '.')")]
    InvalidChar { row: usize, ch: char },
    #[error("matrix of {width}x{height} needs {expected} cells, got {found}")]
    CellCount {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },
}

/// Fatal configuration problems, surfaced when a session is constructed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be between 1x1 and {max}x{max}, got {width}x{height}")]
    InvalidGridSize { width: u8, height: u8, max: u8 },
    #[error("slot count must be at least 1")]
    NoSlots,
    #[error("{name} range is inverted: {min} > {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{name} must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },
    #[error("shape {name:?}: {source}")]
    Shape {
        name: String,
        #[source]
        source: ShapeError,
    },
    #[error("shape {name:?} has no occupied cells")]
    DegenerateShape { name: String },
    #[error("shape {name:?} uses color 0, which marks an empty cell")]
    ReservedColor { name: String },
    #[error("shape library is empty")]
    EmptyLibrary,
    #[error("easy shape pool is empty")]
    EmptyEasyPool,
    #[error("shape library holds {0} shapes, more than a shape id can address")]
    TooManyShapes(usize),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Batch assembly could not fill every slot
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    #[error("easy shape pool is empty; cannot complete the batch")]
    EmptyEasyPool,
}
