//! Shape module - polyomino occupancy matrices
//!
//! A [`ShapeMatrix`] is a small rectangle of booleans, `true` marking an occupied cell.
//! Coordinates: (x, y) where x is the column (left to right) and y the row (top to bottom).
//! Storage is a flat row-major `Vec<bool>`.

use std::fmt;

use crate::error::ShapeError;

/// Occupancy matrix of a single piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    width: usize,
    height: usize,
    /// Row-major (y * width + x)
    cells: Vec<bool>,
}

impl ShapeMatrix {
    /// Build from explicit dimensions and a row-major cell vector
    pub fn new(width: usize, height: usize, cells: Vec<bool>) -> Result<Self, ShapeError> {
        if width == 0 || height == 0 {
            return Err(ShapeError::NoRows);
        }
        if cells.len() != width * height {
            return Err(ShapeError::CellCount {
                width,
                height,
                expected: width * height,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse authored rows where `#` is occupied and `.` is empty.
    ///
    /// ```
    /// use block_blast_core::ShapeMatrix;
    ///
    /// let corner = ShapeMatrix::from_rows(&["##", "#."]).unwrap();
    /// assert_eq!((corner.width(), corner.height()), (2, 2));
    /// assert_eq!(corner.cell_mass(), 3);
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ShapeError> {
        let Some(first) = rows.first() else {
            return Err(ShapeError::NoRows);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(ShapeError::NoRows);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(ShapeError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            for ch in line.chars() {
                match ch {
                    '#' => cells.push(true),
                    '.' => cells.push(false),
                    ch => return Err(ShapeError::InvalidChar { row, ch }),
                }
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// The degenerate 1x1 empty matrix
    pub fn empty() -> Self {
        Self {
            width: 1,
            height: 1,
            cells: vec![false],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Occupancy at (x, y); out of bounds reads as empty
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Number of occupied cells
    pub fn cell_mass(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Offsets of the occupied cells, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &occupied)| occupied)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }

    /// Crop to the bounding box of the occupied cells, re-based to (0, 0).
    ///
    /// An entirely empty matrix trims to [`ShapeMatrix::empty`].
    pub fn trim(&self) -> Self {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        for (x, y) in self.cells() {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if min_x == usize::MAX {
            return Self::empty();
        }

        let width = max_x - min_x + 1;
        let height = max_y - min_y + 1;
        let mut cells = vec![false; width * height];
        for (x, y) in self.cells() {
            cells[(y - min_y) * width + (x - min_x)] = true;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Rotate by 90 degrees and trim.
    ///
    /// Cell (x, y) moves to (y, width - 1 - x) in the new `height x width` matrix.
    pub fn rotate_cw(&self) -> Self {
        let new_width = self.height;
        let new_height = self.width;
        let mut cells = vec![false; new_width * new_height];
        for (x, y) in self.cells() {
            let nx = y;
            let ny = self.width - 1 - x;
            cells[ny * new_width + nx] = true;
        }
        Self {
            width: new_width,
            height: new_height,
            cells,
        }
        .trim()
    }

    /// Distinct orientations reachable by repeated rotation, starting with `self`
    pub fn orientations(&self) -> Vec<Self> {
        let mut out = vec![self.trim()];
        let mut current = out[0].clone();
        for _ in 0..3 {
            current = current.rotate_cw();
            if !out.contains(&current) {
                out.push(current.clone());
            }
        }
        out
    }
}

impl fmt::Display for ShapeMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}
