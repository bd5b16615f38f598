//! Layout module - world/cell coordinate conversion for presentation layers
//!
//! Logical occupancy never depends on these conversions; they only map a drag position to
//! the integer cell the core should validate. Both directions round with `floor`, so the
//! center of cell (x, y) converts back to (x, y) exactly.

/// Placement of the grid in a continuous world space.
///
/// `origin` is the top-left corner of cell (0, 0); y grows downwards like grid rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout {
    pub origin: (f32, f32),
    pub cell_size: f32,
}

impl CellLayout {
    pub fn new(origin: (f32, f32), cell_size: f32) -> Self {
        Self { origin, cell_size }
    }

    /// World position of the center of cell (x, y)
    pub fn cell_center(&self, x: i32, y: i32) -> (f32, f32) {
        (
            self.origin.0 + (x as f32 + 0.5) * self.cell_size,
            self.origin.1 + (y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell containing the world position. May lie outside the grid.
    pub fn world_to_cell(&self, wx: f32, wy: f32) -> (i32, i32) {
        (
            ((wx - self.origin.0) / self.cell_size).floor() as i32,
            ((wy - self.origin.1) / self.cell_size).floor() as i32,
        )
    }
}

impl Default for CellLayout {
    fn default() -> Self {
        Self::new((0.0, 0.0), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_roundtrip() {
        let layout = CellLayout::new((-3.75, 12.5), 0.9);
        for y in -2..10 {
            for x in -2..10 {
                let (wx, wy) = layout.cell_center(x, y);
                assert_eq!(layout.world_to_cell(wx, wy), (x, y));
            }
        }
    }

    #[test]
    fn test_negative_positions_floor() {
        let layout = CellLayout::default();
        assert_eq!(layout.world_to_cell(-0.1, 0.1), (-1, 0));
        assert_eq!(layout.world_to_cell(0.99, 1.0), (0, 1));
    }
}
