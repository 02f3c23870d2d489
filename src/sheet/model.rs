//! Immutable result of a sheet build.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cell_ref::parse_coord_key;
use crate::normalize::display_text;
use crate::types::{Cell, Coord};

use super::index::{CellIndex, MergeIndex};

/// A built grid plus its coordinate and merge indexes.
///
/// Never mutated after construction; a new snapshot produces a new model.
#[derive(Debug, Clone)]
pub struct SheetModel {
    row_count: u32,
    col_count: u32,
    cells: Vec<Cell>,
    cell_index: CellIndex,
    merge_index: MergeIndex,
}

impl SheetModel {
    pub(crate) fn from_cells(row_count: u32, col_count: u32, cells: Vec<Cell>) -> Self {
        let cell_index = CellIndex::build(row_count, col_count);
        let merge_index = MergeIndex::build(&cells, col_count);
        Self {
            row_count,
            col_count,
            cells,
            cell_index,
            merge_index,
        }
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Matrix rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.col_count as usize)
    }

    /// Every coordinate paired with its cell, row-major.
    pub fn entries(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        let col_count = self.col_count;
        (0u32..).zip(self.cells.iter()).map(move |(i, cell)| {
            (Coord::new(i % col_count, i / col_count), cell)
        })
    }

    pub fn cell(&self, at: Coord) -> Option<&Cell> {
        if at.col >= self.col_count || at.row >= self.row_count {
            return None;
        }
        self.cells
            .get(at.row as usize * self.col_count as usize + at.col as usize)
    }

    pub fn cell_by_key(&self, key: &str) -> Option<&Cell> {
        self.cell_index
            .position(key)
            .and_then(|i| self.cells.get(i))
    }

    pub fn cell_index(&self) -> &CellIndex {
        &self.cell_index
    }

    pub fn merge_index(&self) -> &MergeIndex {
        &self.merge_index
    }

    /// Map a spanned coordinate back to its anchor.
    pub fn resolve_anchor(&self, at: Coord) -> Coord {
        self.merge_index.resolve(at)
    }

    /// Key-based [`SheetModel::resolve_anchor`]; `None` for malformed keys.
    pub fn resolve_key(&self, key: &str) -> Option<String> {
        let (col, row) = parse_coord_key(key)?;
        Some(self.resolve_anchor(Coord::new(col, row)).key())
    }

    /// Resolve `at` and return the anchor together with its cell.
    pub fn resolve(&self, at: Coord) -> Option<(Coord, &Cell)> {
        let anchor = self.resolve_anchor(at);
        self.cell(anchor).map(|cell| (anchor, cell))
    }

    /// Merge map in the widget's native `{ "A1": [colSpan, rowSpan] }` form.
    pub fn widget_merge_cells(&self) -> BTreeMap<String, [u32; 2]> {
        self.entries()
            .filter(|(_, cell)| cell.is_merge_anchor())
            .map(|(at, cell)| (at.label(), [cell.merge_across + 1, 1]))
            .collect()
    }

    /// Display text of every cell, row by row.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| row.iter().map(|c| display_text(c).to_string()).collect())
            .collect()
    }

    /// Describe every violation of the merge invariants (empty when sound).
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (at, cell) in self.entries() {
            if cell.merge_child && cell.merge_across != 0 {
                problems.push(format!("{at}: merge child with span {}", cell.merge_across));
            }
            if cell.merge_across > 0 && at.col.saturating_add(cell.merge_across) >= self.col_count {
                problems.push(format!("{at}: span {} leaves the grid", cell.merge_across));
            }
            if cell.merge_child && self.merge_index.anchor_of(at).is_none() {
                problems.push(format!("{at}: merge child without anchor"));
            }
        }
        problems
    }

    /// Serializable view for hosts and the CLI.
    pub fn view(&self) -> SheetView<'_> {
        SheetView {
            row_count: self.row_count,
            col_count: self.col_count,
            matrix: self.rows().collect(),
            merge_anchor_index: self.merge_index.to_key_map(),
            merge_cells: self.widget_merge_cells(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetView<'a> {
    pub row_count: u32,
    pub col_count: u32,
    pub matrix: Vec<&'a [Cell]>,
    pub merge_anchor_index: BTreeMap<String, String>,
    pub merge_cells: BTreeMap<String, [u32; 2]>,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use crate::sheet::patch::CellPatch;
    use crate::sheet::SheetBuilder;
    use crate::types::Coord;

    #[test]
    fn test_entries_are_row_major() {
        let model = SheetBuilder::new(2, 3).build();
        let coords: Vec<Coord> = model.entries().map(|(at, _)| at).collect();
        assert_eq!(coords[0], Coord::new(0, 0));
        assert_eq!(coords[2], Coord::new(2, 0));
        assert_eq!(coords[3], Coord::new(0, 1));
        assert_eq!(coords.len(), 6);
    }

    #[test]
    fn test_widget_merge_map_uses_labels() {
        let mut b = SheetBuilder::new(3, 6);
        b.static_cell(&CellPatch::new(1, 2, "x").merge(2));
        let model = b.build();
        let merges = model.widget_merge_cells();
        assert_eq!(merges.get("B3"), Some(&[3, 1]));
        assert_eq!(merges.len(), 1);
    }

    #[test]
    fn test_resolve_key_rejects_garbage() {
        let model = SheetBuilder::new(2, 2).build();
        assert_eq!(model.resolve_key("1:1").as_deref(), Some("1:1"));
        assert_eq!(model.resolve_key("nope"), None);
    }

    #[test]
    fn test_out_of_range_lookup() {
        let model = SheetBuilder::new(2, 2).build();
        assert!(model.cell(Coord::new(2, 0)).is_none());
        assert!(model.cell_by_key("0:2").is_none());
    }
}
