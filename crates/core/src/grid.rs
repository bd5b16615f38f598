//! Grid module - manages the playfield
//!
//! The grid is a `width x height` field where each cell is either empty or holds the
//! [`ColorTag`] of the visual attached to it. Storing the tag in the cell itself keeps
//! "occupied iff a visual is attached" true for every reachable state.
//! Uses a flat array for cache locality.
//! Coordinates: (x, y) where x is the column (left to right) and y the row (top to bottom).

use crate::types::{Cell, ColorTag, MAX_GRID_EDGE};

/// The playfield using flat row-major storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid. Dimensions are clamped to `1..=MAX_GRID_EDGE`.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.clamp(1, MAX_GRID_EDGE as usize);
        let height = height.clamp(1, MAX_GRID_EDGE as usize);
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Build a grid from rows of `#` (occupied) and `.` (empty).
    ///
    /// Occupied cells carry `ColorTag(1)`. Returns `None` for ragged, empty or oversized input.
    ///
    /// ```
    /// use block_blast_core::Grid;
    ///
    /// let grid = Grid::from_rows(&["#.", ".#"]).unwrap();
    /// assert!(grid.is_occupied(0, 0));
    /// assert!(!grid.is_occupied(1, 0));
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let width = rows.first()?.as_ref().chars().count();
        if width == 0 || width > MAX_GRID_EDGE as usize || rows.len() > MAX_GRID_EDGE as usize {
            return None;
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            let row = row.as_ref();
            if row.chars().count() != width {
                return None;
            }
            for ch in row.chars() {
                cells.push(match ch {
                    '#' => Some(ColorTag(1)),
                    '.' => None,
                    _ => return None,
                });
            }
        }
        Some(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    pub(crate) fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub(crate) fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Check if position is within bounds and empty
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Occupancy by unchecked in-bounds coordinates
    #[inline(always)]
    pub(crate) fn occupied_at(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x].is_some()
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height {
            return false;
        }
        let start = y * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|cell| cell.is_some())
    }

    pub fn is_column_full(&self, x: usize) -> bool {
        if x >= self.width {
            return false;
        }
        (0..self.height).all(|y| self.occupied_at(x, y))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Write the grid as rows of color tags, 0 for empty
    pub fn to_tag_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.map_or(0, ColorTag::get)).collect())
            .collect()
    }
}
