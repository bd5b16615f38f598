//! Placement module - validation and mutation of the grid by shapes
//!
//! Everything here is a method on [`Grid`] with no hidden state: `can_place` and friends
//! are pure, `place` and `clear_full_lines` mutate only the grid they are called on.
//! Logical coordinates are integers throughout; an origin is the grid cell the shape's
//! (0, 0) offset lands on.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::shape::ShapeMatrix;
use crate::types::{ColorTag, MAX_GRID_EDGE};

/// Rows and columns found full, and the distinct cells they cover
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClear {
    pub rows: ArrayVec<usize, { MAX_GRID_EDGE as usize }>,
    pub columns: ArrayVec<usize, { MAX_GRID_EDGE as usize }>,
    /// Union of the full rows and columns, each cell listed once
    pub cells: Vec<(usize, usize)>,
}

impl LineClear {
    pub fn cleared_cells(&self) -> usize {
        self.cells.len()
    }

    /// Rows plus columns
    pub fn lines(&self) -> usize {
        self.rows.len() + self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Outcome of placing a shape and clearing lines, evaluated without mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedPlacement {
    pub lines: usize,
    pub cleared_cells: usize,
    /// Occupied cells left on the grid after the clear
    pub remaining: usize,
    /// Shape cells lying outside every cleared line
    pub overflow: usize,
}

impl Grid {
    /// Check that every occupied cell of `shape` lands in bounds on an empty cell
    pub fn can_place(&self, shape: &ShapeMatrix, ox: i32, oy: i32) -> bool {
        shape
            .cells()
            .all(|(dx, dy)| self.is_free(ox + dx as i32, oy + dy as i32))
    }

    /// Exhaustive scan over every origin of the grid
    pub fn can_fit_anywhere(&self, shape: &ShapeMatrix) -> bool {
        self.valid_origins(shape).next().is_some()
    }

    /// All origins where `shape` can be placed, row-major
    pub fn valid_origins<'a>(
        &'a self,
        shape: &'a ShapeMatrix,
    ) -> impl Iterator<Item = (i32, i32)> + 'a {
        let width = self.width() as i32;
        (0..self.height() as i32)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.can_place(shape, x, y))
    }

    /// Place `shape` at the origin, tagging every covered cell with `color`.
    ///
    /// Re-validates first; returns false without touching the grid if the shape does not fit.
    pub fn place(&mut self, shape: &ShapeMatrix, ox: i32, oy: i32, color: ColorTag) -> bool {
        if shape.is_empty() || !self.can_place(shape, ox, oy) {
            return false;
        }
        for (dx, dy) in shape.cells() {
            self.set(ox + dx as i32, oy + dy as i32, Some(color));
        }
        true
    }

    /// Find full rows and columns on the current state without clearing them
    pub fn full_lines(&self) -> LineClear {
        let mut out = LineClear::default();
        for y in 0..self.height() {
            if self.is_row_full(y) {
                out.rows.push(y);
            }
        }
        for x in 0..self.width() {
            if self.is_column_full(x) {
                out.columns.push(x);
            }
        }
        if out.rows.is_empty() && out.columns.is_empty() {
            return out;
        }

        for y in 0..self.height() {
            let row_full = out.rows.contains(&y);
            for x in 0..self.width() {
                if row_full || out.columns.contains(&x) {
                    out.cells.push((x, y));
                }
            }
        }
        out
    }

    /// Clear every full row and column at once.
    ///
    /// A cell in both a full row and a full column is cleared (and counted) once.
    /// Returns an empty [`LineClear`] and leaves the grid untouched when nothing is full.
    pub fn clear_full_lines(&mut self) -> LineClear {
        let lines = self.full_lines();
        for &(x, y) in &lines.cells {
            self.set(x as i32, y as i32, None);
        }
        lines
    }

    /// Occupied cells divided by total cells
    pub fn fill_percentage(&self) -> f32 {
        self.occupied_count() as f32 / self.area() as f32
    }

    /// Evaluate placing `shape` and clearing lines, without mutating the grid.
    ///
    /// Returns `None` if the shape cannot be placed at the origin.
    pub fn simulate(&self, shape: &ShapeMatrix, ox: i32, oy: i32) -> Option<SimulatedPlacement> {
        if shape.is_empty() || !self.can_place(shape, ox, oy) {
            return None;
        }
        let (ox, oy) = (ox as usize, oy as usize);
        let covered = |x: usize, y: usize| {
            x >= ox && y >= oy && shape.get(x - ox, y - oy)
        };
        let occupied = |x: usize, y: usize| self.occupied_at(x, y) || covered(x, y);

        let (width, height) = (self.width(), self.height());
        let full_rows: ArrayVec<bool, { MAX_GRID_EDGE as usize }> = (0..height)
            .map(|y| (0..width).all(|x| occupied(x, y)))
            .collect();
        let full_cols: ArrayVec<bool, { MAX_GRID_EDGE as usize }> = (0..width)
            .map(|x| (0..height).all(|y| occupied(x, y)))
            .collect();

        let lines = full_rows.iter().filter(|&&f| f).count()
            + full_cols.iter().filter(|&&f| f).count();

        let mut cleared_cells = 0;
        if lines > 0 {
            for y in 0..height {
                for x in 0..width {
                    if full_rows[y] || full_cols[x] {
                        cleared_cells += 1;
                    }
                }
            }
        }

        let overflow = shape
            .cells()
            .filter(|&(dx, dy)| !full_rows[oy + dy] && !full_cols[ox + dx])
            .count();

        Some(SimulatedPlacement {
            lines,
            cleared_cells,
            remaining: self.occupied_count() + shape.cell_mass() - cleared_cells,
            overflow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: &[&str]) -> ShapeMatrix {
        ShapeMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_can_place_exact_boundary() {
        let grid = Grid::new(8, 8);
        let bar = shape(&["####"]);
        assert!(grid.can_place(&bar, 4, 0));
        assert!(!grid.can_place(&bar, 5, 0));
        assert!(!grid.can_place(&bar, -1, 0));
        assert!(grid.can_place(&bar, 0, 7));
        assert!(!grid.can_place(&bar, 0, 8));
    }

    #[test]
    fn test_can_place_ignores_empty_shape_cells() {
        // The empty corner of the shape may overlap an occupied cell.
        let grid = Grid::from_rows(&[".#", ".."]).unwrap();
        assert!(grid.can_place(&shape(&["#.", "##"]), 0, 0));
        assert!(!grid.can_place(&shape(&["##", "#."]), 0, 0));
    }

    #[test]
    fn test_place_rejects_without_mutation() {
        let mut grid = Grid::from_rows(&["#..", "...", "..."]).unwrap();
        let before = grid.clone();
        assert!(!grid.place(&shape(&["##"]), 0, 0, ColorTag(3)));
        assert_eq!(grid, before);

        assert!(grid.place(&shape(&["##"]), 1, 0, ColorTag(3)));
        assert_eq!(grid.get(1, 0), Some(Some(ColorTag(3))));
        assert_eq!(grid.get(2, 0), Some(Some(ColorTag(3))));
    }

    #[test]
    fn test_place_refuses_degenerate_shape() {
        let mut grid = Grid::new(3, 3);
        assert!(!grid.place(&ShapeMatrix::empty(), 0, 0, ColorTag(1)));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_clear_row_and_column_deduplicates() {
        let mut grid = Grid::from_rows(&["###", "#..", "#.."]).unwrap();
        let cleared = grid.clear_full_lines();
        assert_eq!(cleared.rows.as_slice(), &[0]);
        assert_eq!(cleared.columns.as_slice(), &[0]);
        assert_eq!(cleared.cleared_cells(), 5);
        assert_eq!(cleared.lines(), 2);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_clear_nothing_full() {
        let mut grid = Grid::from_rows(&["##.", "#..", "..."]).unwrap();
        let before = grid.clone();
        let cleared = grid.clear_full_lines();
        assert!(cleared.is_empty());
        assert_eq!(cleared.lines(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_fill_percentage() {
        let grid = Grid::from_rows(&["##", ".."]).unwrap();
        assert_eq!(grid.fill_percentage(), 0.5);
        assert_eq!(Grid::new(4, 4).fill_percentage(), 0.0);
    }

    #[test]
    fn test_simulate_matches_real_clear() {
        let grid = Grid::from_rows(&["##.", "##.", "..."]).unwrap();
        let piece = shape(&["#", "#", "#"]);
        let sim = grid.simulate(&piece, 2, 0).unwrap();

        let mut real = grid.clone();
        assert!(real.place(&piece, 2, 0, ColorTag(1)));
        let cleared = real.clear_full_lines();

        assert_eq!(sim.lines, cleared.lines());
        assert_eq!(sim.cleared_cells, cleared.cleared_cells());
        assert_eq!(sim.remaining, real.occupied_count());
        // The bottom cell of the bar sits in the cleared column.
        assert_eq!(sim.overflow, 0);
    }

    #[test]
    fn test_simulate_reports_overflow() {
        let grid = Grid::from_rows(&["##.", "...", "..."]).unwrap();
        let sim = grid.simulate(&shape(&["#", "#"]), 2, 0).unwrap();
        assert_eq!(sim.lines, 1);
        assert_eq!(sim.overflow, 1);
        assert!(grid.simulate(&shape(&["#"]), 0, 0).is_none());
    }

    #[test]
    fn test_valid_origins_on_full_grid() {
        let grid = Grid::from_rows(&["##", "##"]).unwrap();
        assert_eq!(grid.valid_origins(&shape(&["#"])).count(), 0);
        assert!(!grid.can_fit_anywhere(&shape(&["#"])));
    }
}
