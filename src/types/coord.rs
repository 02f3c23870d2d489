use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell_ref::{cell_label, coord_key};

/// Zero-based `(col, row)` grid coordinate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub col: u32,
    pub row: u32,
}

impl Coord {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Lookup key, `"{col}:{row}"`.
    pub fn key(&self) -> String {
        coord_key(self.col, self.row)
    }

    /// A1-style label, e.g. `B3`.
    pub fn label(&self) -> String {
        cell_label(self.col, self.row)
    }

    /// The coordinate `cols` columns to the right on the same row.
    pub fn right(&self, cols: u32) -> Self {
        Self::new(self.col.saturating_add(cols), self.row)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.col, self.row)
    }
}

impl From<(u32, u32)> for Coord {
    fn from((col, row): (u32, u32)) -> Self {
        Self::new(col, row)
    }
}

/// Rectangular region of the grid, anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub col: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(col: u32, row: u32, width: u32, height: u32) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    /// A single row strip.
    pub const fn row_strip(row: u32, col: u32, width: u32) -> Self {
        Self::new(col, row, width, 1)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clip to a `col_count × row_count` grid.
    ///
    /// Returns `None` when nothing of the region lies inside the grid.
    pub fn clip(&self, col_count: u32, row_count: u32) -> Option<Self> {
        if self.is_empty() || self.col >= col_count || self.row >= row_count {
            return None;
        }
        let end_col = self.col.saturating_add(self.width).min(col_count);
        let end_row = self.row.saturating_add(self.height).min(row_count);
        Some(Self::new(
            self.col,
            self.row,
            end_col - self.col,
            end_row - self.row,
        ))
    }

    /// Last column inside the region (inclusive).
    pub fn last_col(&self) -> u32 {
        self.col + self.width.saturating_sub(1)
    }

    /// Last row inside the region (inclusive).
    pub fn last_row(&self) -> u32 {
        self.row + self.height.saturating_sub(1)
    }

    /// All coordinates of the region, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let cols = self.col..self.col.saturating_add(self.width);
        (self.row..self.row.saturating_add(self.height))
            .flat_map(move |row| cols.clone().map(move |col| Coord::new(col, row)))
    }
}
