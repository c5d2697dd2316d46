//! Maze grid: a fixed rectangle of typed cells
//!
//! Cell (col, row) covers the unit square [col, col+1] × [row, row+1] in
//! cell units. Storage is row-major.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::levels::LevelError;

/// Cell types, with their level-data codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Wall = 1,
    Hole = 2,
    Goal = 3,
}

impl Cell {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Wall),
            2 => Some(Cell::Hole),
            3 => Some(Cell::Goal),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// An immutable-per-level maze grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-empty grid (at least 1×1)
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Build a grid from row-major cell codes (0..=3)
    pub fn from_codes(width: usize, height: usize, codes: &[u8]) -> Result<Self, LevelError> {
        if width == 0 || height == 0 || codes.len() != width * height {
            return Err(LevelError::Malformed(format!(
                "{} codes for a {}x{} grid",
                codes.len(),
                width,
                height
            )));
        }
        let cells = codes
            .iter()
            .map(|&c| Cell::from_code(c).ok_or(LevelError::BadCellCode(c)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid extent in cell units
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Cell at (col, row); out-of-bounds reads as empty
    pub fn get(&self, col: usize, row: usize) -> Cell {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col]
        } else {
            Cell::Empty
        }
    }

    /// Overwrite a cell (level hydration only)
    pub(crate) fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = cell;
        }
    }

    /// Cell containing a point, clamped into the grid
    pub fn cell_of(&self, pos: Vec2) -> (usize, usize) {
        let col = (pos.x.floor().max(0.0) as usize).min(self.width - 1);
        let row = (pos.y.floor().max(0.0) as usize).min(self.height - 1);
        (col, row)
    }

    /// The 3×3 block of cells around the cell containing `pos`, clipped to the
    /// grid, in row-major order
    pub fn neighborhood(&self, pos: Vec2) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let (col, row) = self.cell_of(pos);
        let rows = row.saturating_sub(1)..=(row + 1).min(self.height - 1);
        rows.flat_map(move |r| {
            let cols = col.saturating_sub(1)..=(col + 1).min(self.width - 1);
            cols.map(move |c| (c, r, self.get(c, r)))
        })
    }

    /// Position of the first cell of the given kind, if any
    pub fn find(&self, kind: Cell) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&c| c == kind)
            .map(|i| (i % self.width, i / self.width))
    }

    /// Cells as row-major codes
    pub fn codes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.code()).collect()
    }
}
