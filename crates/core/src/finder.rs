//! Finder module - pool heuristics used by the spawner
//!
//! Every query is a pure function of the grid and a pool of shape ids; nothing here
//! mutates the grid. Ids missing from the library are skipped.
//!
//! # Contact score
//!
//! A placement is scored by how tightly it nestles into existing terrain. Each boundary
//! edge of the shape (an edge between a shape cell and a non-shape cell, 4-neighbourhood)
//! contributes:
//!
//! | Neighbour | Weight |
//! |-----------|--------|
//! | grid wall | 0.35 |
//! | occupied cell | 1.0 |
//! | empty cell | 0.0 |
//!
//! The placement score is the weight sum divided by the boundary edge count; a shape's
//! score is the best over all valid placements.

use crate::grid::Grid;
use crate::library::ShapeLibrary;
use crate::shape::ShapeMatrix;
use crate::types::{
    ShapeId, BLOCK_CONTACT_WEIGHT, LARGE_SHAPE_MIN_MASS, MEGA_KILL_MIN_LINES, SCORE_TIE_EPSILON,
    WALL_CONTACT_WEIGHT,
};

const NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, Copy)]
pub struct ShapeFinder<'a> {
    grid: &'a Grid,
    library: &'a ShapeLibrary,
}

impl<'a> ShapeFinder<'a> {
    pub fn new(grid: &'a Grid, library: &'a ShapeLibrary) -> Self {
        Self { grid, library }
    }

    fn shapes<'p>(
        &self,
        pool: &'p [ShapeId],
    ) -> impl Iterator<Item = (ShapeId, &'a ShapeMatrix)> + 'p
    where
        'a: 'p,
    {
        let library = self.library;
        pool.iter()
            .filter_map(move |&id| library.matrix(id).map(|m| (id, m)))
    }

    /// Shapes that can be placed somewhere on the grid
    pub fn fits(&self, pool: &[ShapeId]) -> Vec<ShapeId> {
        self.shapes(pool)
            .filter(|(_, m)| self.grid.can_fit_anywhere(m))
            .map(|(id, _)| id)
            .collect()
    }

    /// Most lines (rows plus columns) a single placement of `shape` clears
    pub fn max_potential_clear(&self, shape: &ShapeMatrix) -> usize {
        self.grid
            .valid_origins(shape)
            .filter_map(|(x, y)| self.grid.simulate(shape, x, y))
            .map(|sim| sim.lines)
            .max()
            .unwrap_or(0)
    }

    /// Shapes clearing at least three lines at once, keeping only the best line count
    pub fn mega_killers(&self, pool: &[ShapeId]) -> Vec<ShapeId> {
        let scored: Vec<(ShapeId, usize)> = self
            .shapes(pool)
            .filter(|(_, m)| m.cell_mass() > 1)
            .map(|(id, m)| (id, self.max_potential_clear(m)))
            .filter(|&(_, lines)| lines >= MEGA_KILL_MIN_LINES)
            .collect();

        let Some(best) = scored.iter().map(|&(_, lines)| lines).max() else {
            return Vec::new();
        };
        scored
            .into_iter()
            .filter(|&(_, lines)| lines == best)
            .map(|(id, _)| id)
            .collect()
    }

    /// Shapes with a placement clearing one or two lines where every shape cell lies in
    /// a cleared line
    pub fn clean_killers(&self, pool: &[ShapeId]) -> Vec<ShapeId> {
        self.shapes(pool)
            .filter(|(_, m)| {
                self.grid
                    .valid_origins(m)
                    .filter_map(|(x, y)| self.grid.simulate(m, x, y))
                    .any(|sim| (1..=2).contains(&sim.lines) && sim.overflow == 0)
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Contact score of `shape` at the origin. Does not check that the placement is valid.
    pub fn contact_score(&self, shape: &ShapeMatrix, ox: i32, oy: i32) -> f32 {
        let mut edges = 0u32;
        let mut weight = 0.0f32;
        for (dx, dy) in shape.cells() {
            for (nx, ny) in NEIGHBOURS {
                let (lx, ly) = (dx as i32 + nx, dy as i32 + ny);
                if lx >= 0 && ly >= 0 && shape.get(lx as usize, ly as usize) {
                    continue;
                }
                edges += 1;
                let (gx, gy) = (ox + lx, oy + ly);
                if !self.grid.in_bounds(gx, gy) {
                    weight += WALL_CONTACT_WEIGHT;
                } else if self.grid.is_occupied(gx, gy) {
                    weight += BLOCK_CONTACT_WEIGHT;
                }
            }
        }
        if edges == 0 {
            return 0.0;
        }
        weight / edges as f32
    }

    /// Best contact score over all valid placements, `None` if the shape does not fit
    pub fn best_contact_score(&self, shape: &ShapeMatrix) -> Option<f32> {
        self.grid
            .valid_origins(shape)
            .map(|(x, y)| self.contact_score(shape, x, y))
            .reduce(f32::max)
    }

    /// Hole fillers restricted to shapes of at least four cells
    pub fn large_perfect_fits(&self, pool: &[ShapeId], threshold: f32) -> Vec<ShapeId> {
        self.best_scoring(pool, threshold, LARGE_SHAPE_MIN_MASS)
    }

    /// Shapes whose best contact score reaches `threshold`, keeping the top-scoring ties
    pub fn hole_fillers(&self, pool: &[ShapeId], threshold: f32) -> Vec<ShapeId> {
        self.best_scoring(pool, threshold, 1)
    }

    fn best_scoring(&self, pool: &[ShapeId], threshold: f32, min_mass: usize) -> Vec<ShapeId> {
        let scored: Vec<(ShapeId, f32)> = self
            .shapes(pool)
            .filter(|(_, m)| m.cell_mass() >= min_mass)
            .filter_map(|(id, m)| self.best_contact_score(m).map(|s| (id, s)))
            .filter(|&(_, score)| score >= threshold)
            .collect();

        let Some(best) = scored.iter().map(|&(_, s)| s).reduce(f32::max) else {
            return Vec::new();
        };
        scored
            .into_iter()
            .filter(|&(_, score)| score >= best - SCORE_TIE_EPSILON)
            .map(|(id, _)| id)
            .collect()
    }

    /// Largest shape (more than one cell) with a placement that empties the whole grid.
    ///
    /// Ties on mass go to the earliest shape in `pool`.
    pub fn full_clear_rescue(&self, pool: &[ShapeId]) -> Option<ShapeId> {
        let mut best: Option<(ShapeId, usize)> = None;
        for (id, m) in self.shapes(pool) {
            let mass = m.cell_mass();
            if mass <= 1 || best.is_some_and(|(_, b)| mass <= b) {
                continue;
            }
            let empties = self
                .grid
                .valid_origins(m)
                .filter_map(|(x, y)| self.grid.simulate(m, x, y))
                .any(|sim| sim.remaining == 0);
            if empties {
                best = Some((id, mass));
            }
        }
        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ShapeSpec;

    fn library(shapes: &[(&str, &[&str])]) -> ShapeLibrary {
        let specs: Vec<ShapeSpec> = shapes
            .iter()
            .map(|(name, rows)| ShapeSpec {
                name: name.to_string(),
                rows: rows.iter().map(|r| r.to_string()).collect(),
                color: None,
                easy: false,
                rotations: false,
            })
            .collect();
        ShapeLibrary::from_specs(&specs, 5).unwrap()
    }

    #[test]
    fn test_contact_score_weights() {
        let grid = Grid::from_rows(&["...", "#..", "..."]).unwrap();
        let lib = library(&[("dot", &["#"])]);
        let finder = ShapeFinder::new(&grid, &lib);
        let dot = lib.matrix(ShapeId(0)).unwrap();

        // Corner (0,0): two walls, one block below, one empty.
        let score = finder.contact_score(dot, 0, 0);
        assert!((score - (0.35 + 0.35 + 1.0) / 4.0).abs() < 1e-6);

        // Center: one block to the left, three empty.
        let score = finder.contact_score(dot, 1, 1);
        assert!((score - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_internal_edges_not_counted() {
        let grid = Grid::new(4, 1);
        let lib = library(&[("bar", &["####"])]);
        let finder = ShapeFinder::new(&grid, &lib);
        // 10 boundary edges, all walls.
        let score = finder.contact_score(lib.matrix(ShapeId(0)).unwrap(), 0, 0);
        assert!((score - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_hole_filler_prefers_snug_fit() {
        let grid = Grid::from_rows(&["####", "#..#", "####"]).unwrap();
        let lib = library(&[("domino", &["##"]), ("dot", &["#"])]);
        let finder = ShapeFinder::new(&grid, &lib);
        // The domino fills the hole with every edge touching blocks.
        assert_eq!(finder.hole_fillers(lib.all(), 0.7), vec![ShapeId(0)]);
    }

    #[test]
    fn test_hole_filler_ties_kept() {
        let grid = Grid::from_rows(&["#.#", "###"]).unwrap();
        let lib = library(&[("a", &["#"]), ("b", &["#"])]);
        let finder = ShapeFinder::new(&grid, &lib);
        assert_eq!(finder.hole_fillers(lib.all(), 0.5), vec![ShapeId(0), ShapeId(1)]);
        assert!(finder.hole_fillers(lib.all(), 0.95).is_empty());
    }

    #[test]
    fn test_mega_killers_keep_best_line_count() {
        // Filling the last column completes three rows.
        let grid = Grid::from_rows(&["###.", "###.", "###.", "...."]).unwrap();
        let lib = library(&[("bar3", &["#", "#", "#"]), ("bar2", &["#", "#"])]);
        let finder = ShapeFinder::new(&grid, &lib);
        assert_eq!(finder.max_potential_clear(lib.matrix(ShapeId(0)).unwrap()), 3);
        assert_eq!(finder.max_potential_clear(lib.matrix(ShapeId(1)).unwrap()), 2);
        assert_eq!(finder.mega_killers(lib.all()), vec![ShapeId(0)]);
    }

    #[test]
    fn test_mega_killers_empty_when_below_three() {
        let grid = Grid::from_rows(&["###.", "....", "....", "...."]).unwrap();
        let lib = library(&[("dot", &["#"]), ("bar2", &["#", "#"])]);
        let finder = ShapeFinder::new(&grid, &lib);
        assert!(finder.mega_killers(lib.all()).is_empty());
    }

    #[test]
    fn test_full_clear_rescue_picks_largest() {
        let grid = Grid::from_rows(&["##..", "#...", "....", "...."]).unwrap();
        let lib = library(&[("dot", &["#"]), ("bar2", &["##"]), ("sq", &["##", "##"])]);
        let finder = ShapeFinder::new(&grid, &lib);
        assert_eq!(finder.full_clear_rescue(lib.all()), None);

        let grid = Grid::from_rows(&["##..", "##..", "....", "...."]).unwrap();
        let finder = ShapeFinder::new(&grid, &lib);
        // The square completes both rows; the bar completes only one.
        assert_eq!(finder.full_clear_rescue(lib.all()), Some(ShapeId(2)));
    }

    #[test]
    fn test_fits_skips_unknown_ids() {
        let grid = Grid::new(2, 2);
        let lib = library(&[("dot", &["#"]), ("bar", &["###"])]);
        let finder = ShapeFinder::new(&grid, &lib);
        assert_eq!(
            finder.fits(&[ShapeId(0), ShapeId(1), ShapeId(99)]),
            vec![ShapeId(0)]
        );
    }
}
