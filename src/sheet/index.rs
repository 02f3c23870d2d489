//! O(1) lookups derived from a built grid.

use std::collections::{BTreeMap, HashMap};

use crate::cell_ref::parse_coord_key;
use crate::types::{Cell, Coord};

/// `"col:row"` key -> position in the row-major cell vector.
#[derive(Debug, Clone, Default)]
pub struct CellIndex {
    slots: HashMap<String, usize>,
}

impl CellIndex {
    pub(crate) fn build(row_count: u32, col_count: u32) -> Self {
        let mut slots = HashMap::with_capacity(row_count as usize * col_count as usize);
        let mut position = 0usize;
        for row in 0..row_count {
            for col in 0..col_count {
                slots.insert(Coord::new(col, row).key(), position);
                position += 1;
            }
        }
        Self { slots }
    }

    /// Position of `key` in the cell vector.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.slots.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }
}

/// Merge child -> anchor lookup.
#[derive(Debug, Clone, Default)]
pub struct MergeIndex {
    anchors: HashMap<Coord, Coord>,
}

impl MergeIndex {
    /// Walk every anchor and record the children actually inside its span.
    pub(crate) fn build(cells: &[Cell], col_count: u32) -> Self {
        let mut anchors = HashMap::new();
        let width = col_count as usize;
        if width == 0 {
            return Self { anchors };
        }
        for (row, row_cells) in (0u32..).zip(cells.chunks(width)) {
            for (col, cell) in (0u32..).zip(row_cells) {
                if !cell.is_merge_anchor() {
                    continue;
                }
                let anchor = Coord::new(col, row);
                for k in 1..=cell.merge_across {
                    let child = anchor.right(k);
                    let is_child = row_cells
                        .get(child.col as usize)
                        .is_some_and(|c| c.merge_child);
                    if is_child {
                        anchors.insert(child, anchor);
                    }
                }
            }
        }
        Self { anchors }
    }

    /// Anchor owning `coord`, when `coord` is a merge child.
    pub fn anchor_of(&self, coord: Coord) -> Option<Coord> {
        self.anchors.get(&coord).copied()
    }

    /// The anchor for a merge child, `coord` itself for everything else.
    pub fn resolve(&self, coord: Coord) -> Coord {
        self.anchor_of(coord).unwrap_or(coord)
    }

    /// Key-based variant of [`MergeIndex::anchor_of`].
    pub fn anchor_key(&self, key: &str) -> Option<String> {
        let (col, row) = parse_coord_key(key)?;
        self.anchor_of(Coord::new(col, row)).map(|a| a.key())
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.anchors.iter().map(|(child, anchor)| (*child, *anchor))
    }

    /// `{ childKey: anchorKey }`, sorted for stable output.
    pub fn to_key_map(&self) -> BTreeMap<String, String> {
        self.anchors
            .iter()
            .map(|(child, anchor)| (child.key(), anchor.key()))
            .collect()
    }
}
