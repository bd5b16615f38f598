use serde::{Deserialize, Serialize};

use crate::types::{SessionStatus, ShapeId, SpawnerMode};

/// Point-in-time copy of a session for presentation and tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Rows of color tags, 0 for empty
    pub grid: Vec<Vec<u8>>,
    pub batch: Vec<Option<ShapeId>>,
    pub status: SessionStatus,
    pub mode: SpawnerMode,
    pub score: u64,
    pub best_score: u64,
    pub multiplier: u32,
    pub rounds: u32,
    pub lines_cleared: u32,
    pub moves_played: u32,
    pub warmup_target: u32,
    pub dynamic_threshold: f32,
    pub revive_credits: u8,
}

impl GameSnapshot {
    pub fn width(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.grid.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&tag| tag != 0).count()
    }

    /// Render the grid as `#`/`.` rows, one line per row
    pub fn grid_ascii(&self) -> String {
        self.grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&tag| if tag == 0 { '.' } else { '#' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
