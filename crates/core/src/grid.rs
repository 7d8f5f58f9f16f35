//! Flat row-major cell storage and the read-only queries renderers rely on.

use std::error::Error;
use std::fmt;
use std::slice::ChunksExact;

use xxhash_rust::xxh3::xxh3_64;

use crate::cell::Cell;
use crate::config::{ConfigError, check_dimensions};

/// Offsets of the Moore neighborhood, center excluded.
const MOORE_OFFSETS: [(isize, isize); 8] =
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

/// A fixed-size binary grid. Cell `(x, y)` lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaveGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CaveGrid {
    pub fn filled(width: usize, height: usize, cell: Cell) -> Result<Self, ConfigError> {
        let len = check_dimensions(width, height)?;
        Ok(Self { width, height, cells: vec![cell; len] })
    }

    /// Builds a grid from text rows of `#` (wall) and `.` (open).
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridParseError> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(GridParseError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow { row: row_index, expected: width, found });
            }
            for (column, glyph) in row.chars().enumerate() {
                let cell = Cell::from_glyph(glyph).ok_or(GridParseError::UnknownGlyph {
                    row: row_index,
                    column,
                    glyph,
                })?;
                cells.push(cell);
            }
        }

        Ok(Self { width, height: rows.len(), cells })
    }

    pub(crate) fn from_raw_parts(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn rows(&self) -> ChunksExact<'_, Cell> {
        self.cells.chunks_exact(self.width)
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.in_bounds(x, y).then(|| self.cells[y * self.width + x])
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(Cell::is_wall)
    }

    /// Sets a cell, returning `false` when `(x, y)` is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[y * self.width + x] = cell;
        true
    }

    /// Number of walls among the eight cells surrounding `(x, y)`.
    ///
    /// Neighbors outside the grid count as open: the edge neither wraps nor
    /// acts as a wall. Coordinates outside the grid are accepted and only
    /// their in-bounds neighbors are counted.
    pub fn count_neighbors(&self, x: usize, y: usize) -> u8 {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                let nx = x.checked_add_signed(dx)?;
                let ny = y.checked_add_signed(dy)?;
                self.get(nx, ny)
            })
            .map(Cell::state)
            .sum()
    }

    /// Neighbor counts for every cell, row-major.
    pub fn neighbor_counts(&self) -> Vec<u8> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| self.count_neighbors(x, y))
            .collect()
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_wall()).count()
    }

    pub fn open_count(&self) -> usize {
        self.len() - self.wall_count()
    }

    pub fn wall_ratio(&self) -> f64 {
        self.wall_count() as f64 / self.len() as f64
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16 + self.cells.len());
        bytes.extend((self.width as u64).to_le_bytes());
        bytes.extend((self.height as u64).to_le_bytes());
        bytes.extend(self.cells.iter().map(|cell| cell.state()));
        bytes
    }

    /// Stable 64-bit digest of dimensions and cells.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

impl fmt::Display for CaveGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridParseError {
    Empty,
    RaggedRow { row: usize, expected: usize, found: usize },
    UnknownGlyph { row: usize, column: usize, glyph: char },
}

impl fmt::Display for GridParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid text has no cells"),
            Self::RaggedRow { row, expected, found } => {
                write!(f, "row {row} has {found} cells, expected {expected}")
            }
            Self::UnknownGlyph { row, column, glyph } => {
                write!(f, "unknown cell glyph '{glyph}' at row {row}, column {column}")
            }
        }
    }
}

impl Error for GridParseError {}
