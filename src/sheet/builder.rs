//! Sheet construction from an ordered list of region patches.
//!
//! The builder knows nothing about forums, boards or posts. It allocates an
//! all-blank grid and executes four primitives in order: surface fill,
//! outline, static cell and action cell. Cell patches may additionally
//! request a horizontal merge, which is applied right after the anchor's own
//! fields are written.

use crate::trigger::Trigger;
use crate::types::{
    Cell, Coord, Region, DEFAULT_BORDER, KIND_BLANK, KIND_BUTTON, KIND_MERGE_CHILD, KIND_TEXT,
    OUTLINE_BORDER,
};

use super::model::SheetModel;
use super::patch::{ActionPatch, CellPatch, Patch, SheetInput};

/// Smallest grid the builder will allocate.
pub const MIN_ROW_COUNT: u32 = 1;
pub const MIN_COL_COUNT: u32 = 1;
/// Upper bounds keep a bogus snapshot from allocating millions of cells.
pub const MAX_ROW_COUNT: u32 = 2000;
pub const MAX_COL_COUNT: u32 = 256;

/// Build a sheet model from a full patch script.
pub fn build(input: &SheetInput) -> SheetModel {
    let mut builder = SheetBuilder::new(input.row_count, input.col_count);
    for patch in &input.patches {
        builder.apply(patch);
    }
    builder.build()
}

/// Mutable grid under construction.
#[derive(Debug, Clone)]
pub struct SheetBuilder {
    row_count: u32,
    col_count: u32,
    cells: Vec<Cell>,
}

impl SheetBuilder {
    pub fn new(row_count: u32, col_count: u32) -> Self {
        let row_count = row_count.clamp(MIN_ROW_COUNT, MAX_ROW_COUNT);
        let col_count = col_count.clamp(MIN_COL_COUNT, MAX_COL_COUNT);
        let len = (row_count as usize) * (col_count as usize);
        Self {
            row_count,
            col_count,
            cells: vec![Cell::blank(); len],
        }
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    pub fn cell(&self, at: Coord) -> Option<&Cell> {
        self.slot_index(at).and_then(|i| self.cells.get(i))
    }

    fn slot_index(&self, at: Coord) -> Option<usize> {
        if at.col >= self.col_count || at.row >= self.row_count {
            return None;
        }
        Some(at.row as usize * self.col_count as usize + at.col as usize)
    }

    fn slot(&mut self, at: Coord) -> Option<&mut Cell> {
        let index = self.slot_index(at)?;
        self.cells.get_mut(index)
    }

    /// Execute one patch.
    pub fn apply(&mut self, patch: &Patch) -> &mut Self {
        match patch {
            Patch::Surface(p) => self.fill_surface(p.region, &p.surface),
            Patch::Outline(p) => self.outline(p.region),
            Patch::Cell(p) => self.static_cell(p),
            Patch::Action(p) => self.action_cell(p),
        }
    }

    /// Set `surface` on every cell of `region` that lies inside the grid.
    pub fn fill_surface(&mut self, region: Region, surface: &str) -> &mut Self {
        let Some(region) = region.clip(self.col_count, self.row_count) else {
            log::debug!("surface fill {region:?} lies outside the grid");
            return self;
        };
        for at in region.coords() {
            if let Some(cell) = self.slot(at) {
                cell.surface = surface.to_string();
            }
        }
        self
    }

    /// Thick border on the outer edge of `region`; interior borders untouched.
    pub fn outline(&mut self, region: Region) -> &mut Self {
        let Some(region) = region.clip(self.col_count, self.row_count) else {
            log::debug!("outline {region:?} lies outside the grid");
            return self;
        };
        let (first_col, last_col) = (region.col, region.last_col());
        let (first_row, last_row) = (region.row, region.last_row());
        for at in region.coords() {
            let Some(cell) = self.slot(at) else {
                continue;
            };
            if at.row == first_row {
                cell.border_top = OUTLINE_BORDER;
            }
            if at.row == last_row {
                cell.border_bottom = OUTLINE_BORDER;
            }
            if at.col == first_col {
                cell.border_left = OUTLINE_BORDER;
            }
            if at.col == last_col {
                cell.border_right = OUTLINE_BORDER;
            }
        }
        self
    }

    /// Write static content, then merge if a span was requested.
    pub fn static_cell(&mut self, patch: &CellPatch) -> &mut Self {
        let at = patch.coord();
        if !self.prepare_anchor(at, patch.merge_across.is_some()) {
            log::debug!("cell patch at {at} lies outside the grid");
            return self;
        }
        if let Some(cell) = self.slot(at) {
            write_content(
                cell,
                &patch.text,
                patch.formula_text.as_deref(),
                patch.kind.as_deref().unwrap_or(KIND_TEXT),
                patch.surface.as_deref(),
            );
        }
        if let Some(span) = patch.merge_across {
            self.merge_across(at, span);
        }
        self
    }

    /// Write content plus action fields, then merge if a span was requested.
    pub fn action_cell(&mut self, patch: &ActionPatch) -> &mut Self {
        let at = patch.coord();
        if !self.prepare_anchor(at, patch.merge_across.is_some()) {
            log::debug!("action patch at {at} lies outside the grid");
            return self;
        }
        if let Some(cell) = self.slot(at) {
            write_content(
                cell,
                &patch.text,
                patch.formula_text.as_deref(),
                patch.kind.as_deref().unwrap_or(KIND_BUTTON),
                patch.surface.as_deref(),
            );
            cell.action_type = patch.action_type.clone();
            cell.action_payload = patch.action_payload.clone();
            cell.trigger = patch
                .trigger
                .clone()
                .unwrap_or_else(|| Trigger::Single.as_str().to_string());
            cell.active = patch.active;
            cell.disabled = patch.disabled;
        }
        if let Some(span) = patch.merge_across {
            self.merge_across(at, span);
        }
        self
    }

    /// Make `at` writable as an anchor-or-plain cell.
    ///
    /// A merge child is cut out of its anchor's span; an existing anchor
    /// loses its old span when a new one is about to be requested.
    fn prepare_anchor(&mut self, at: Coord, remerge: bool) -> bool {
        let Some(cell) = self.cell(at) else {
            return false;
        };
        if cell.merge_child {
            self.detach_child(at);
        } else if remerge && cell.merge_across > 0 {
            self.dissolve(at);
        }
        true
    }

    /// Horizontal merge anchored at `anchor`.
    ///
    /// The span is clipped to `col_count - col - 1`, keeping the last column
    /// out of every merge.
    fn merge_across(&mut self, anchor: Coord, requested: u32) {
        let room = self
            .col_count
            .saturating_sub(anchor.col)
            .saturating_sub(1);
        let span = requested.min(room);
        if span == 0 {
            return;
        }
        for k in 1..=span {
            let at = anchor.right(k);
            if self.cell(at).is_some_and(Cell::is_merge_anchor) {
                self.dissolve(at);
            }
        }

        let Some(template) = self.cell(anchor).cloned() else {
            return;
        };
        if let Some(cell) = self.slot(anchor) {
            cell.merge_across = span;
            cell.merge_child = false;
            cell.border_right = 0;
        }
        for k in 1..=span {
            let Some(child) = self.slot(anchor.right(k)) else {
                continue;
            };
            child.kind = KIND_MERGE_CHILD.to_string();
            child.text.clear();
            child.formula_text.clear();
            child.merge_child = true;
            child.merge_across = 0;
            child.action_type = template.action_type.clone();
            child.action_payload = template.action_payload.clone();
            child.trigger = template.trigger.clone();
            child.disabled = template.disabled;
            child.border_top = template.border_top;
            child.border_bottom = template.border_bottom;
            child.border_left = 0;
            child.border_right = if k == span { template.border_right } else { 0 };
        }
    }

    /// Remove the span of the anchor at `anchor`, releasing its children.
    fn dissolve(&mut self, anchor: Coord) {
        let Some(span) = self.cell(anchor).map(|c| c.merge_across) else {
            return;
        };
        let last_right = self
            .cell(anchor.right(span))
            .filter(|c| c.merge_child)
            .map_or(DEFAULT_BORDER, |c| c.border_right);
        if let Some(cell) = self.slot(anchor) {
            cell.merge_across = 0;
            cell.border_right = last_right;
        }
        for k in 1..=span {
            self.release_child(anchor.right(k));
        }
    }

    /// Cut the merge child at `at` out of its anchor's span.
    fn detach_child(&mut self, at: Coord) {
        let anchor = (0..at.col)
            .rev()
            .map(|col| Coord::new(col, at.row))
            .find(|c| self.cell(*c).is_some_and(|cell| !cell.merge_child));
        let Some(anchor) = anchor else {
            self.release_child(at);
            return;
        };
        let span = self.cell(anchor).map_or(0, |c| c.merge_across);
        let end = anchor.col.saturating_add(span);
        if end < at.col {
            self.release_child(at);
            return;
        }
        let kept = at.col - anchor.col - 1;
        if let Some(cell) = self.slot(anchor) {
            cell.merge_across = kept;
            if kept == 0 {
                cell.border_right = DEFAULT_BORDER;
            }
        }
        if kept > 0 {
            if let Some(last) = self.slot(anchor.right(kept)) {
                last.border_right = DEFAULT_BORDER;
            }
        }
        for col in at.col..=end {
            self.release_child(Coord::new(col, at.row));
        }
    }

    /// Turn a merge child back into an independent blank cell.
    fn release_child(&mut self, at: Coord) {
        let Some(cell) = self.slot(at) else {
            return;
        };
        if !cell.merge_child {
            return;
        }
        let released = Cell {
            surface: std::mem::take(&mut cell.surface),
            border_top: cell.border_top,
            border_bottom: cell.border_bottom,
            kind: KIND_BLANK.to_string(),
            ..Cell::blank()
        };
        *cell = released;
    }

    /// Freeze the grid and derive its lookup indexes.
    pub fn build(self) -> SheetModel {
        SheetModel::from_cells(self.row_count, self.col_count, self.cells)
    }
}

fn write_content(
    cell: &mut Cell,
    text: &str,
    formula_text: Option<&str>,
    kind: &str,
    surface: Option<&str>,
) {
    cell.text = text.to_string();
    cell.formula_text = formula_text.unwrap_or(text).to_string();
    cell.kind = kind.to_string();
    if let Some(surface) = surface {
        cell.surface = surface.to_string();
    }
    cell.merge_child = false;
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::sheet::patch::{outline, surface};

    #[test]
    fn test_counts_are_clamped() {
        let b = SheetBuilder::new(0, 0);
        assert_eq!((b.row_count(), b.col_count()), (1, 1));
        let b = SheetBuilder::new(u32::MAX, u32::MAX);
        assert_eq!((b.row_count(), b.col_count()), (MAX_ROW_COUNT, MAX_COL_COUNT));
    }

    #[test]
    fn test_outline_touches_perimeter_only() {
        let mut b = SheetBuilder::new(4, 4);
        b.apply(&outline(Region::new(0, 0, 3, 3)));
        let corner = b.cell(Coord::new(0, 0)).unwrap();
        assert_eq!((corner.border_top, corner.border_left), (2, 2));
        assert_eq!((corner.border_right, corner.border_bottom), (1, 1));
        let middle = b.cell(Coord::new(1, 1)).unwrap();
        assert_eq!(
            (middle.border_top, middle.border_right, middle.border_bottom, middle.border_left),
            (1, 1, 1, 1)
        );
        let far = b.cell(Coord::new(2, 2)).unwrap();
        assert_eq!((far.border_right, far.border_bottom), (2, 2));
        let outside = b.cell(Coord::new(3, 3)).unwrap();
        assert_eq!(outside.border_left, 1);
    }

    #[test]
    fn test_later_patch_keeps_unspecified_fields() {
        let mut b = SheetBuilder::new(3, 3);
        b.apply(&surface(Region::new(0, 0, 3, 3), "panel"));
        b.static_cell(&CellPatch::new(1, 1, "Hi"));
        let cell = b.cell(Coord::new(1, 1)).unwrap();
        assert_eq!(cell.surface, "panel");
        assert_eq!(cell.kind, "text");

        b.static_cell(&CellPatch::new(1, 1, "Bye").surface("hero"));
        let cell = b.cell(Coord::new(1, 1)).unwrap();
        assert_eq!(cell.text, "Bye");
        assert_eq!(cell.surface, "hero");
    }

    #[test]
    fn test_merge_clipping_reserves_last_column() {
        let mut b = SheetBuilder::new(1, 10);
        b.static_cell(&CellPatch::new(8, 0, "x").merge(5));
        assert_eq!(b.cell(Coord::new(8, 0)).unwrap().merge_across, 1);
        assert!(b.cell(Coord::new(9, 0)).unwrap().merge_child);

        let mut b = SheetBuilder::new(1, 10);
        b.static_cell(&CellPatch::new(9, 0, "x").merge(5));
        assert_eq!(b.cell(Coord::new(9, 0)).unwrap().merge_across, 0);
    }

    #[test]
    fn test_last_child_keeps_original_right_border() {
        let mut b = SheetBuilder::new(1, 6);
        b.apply(&outline(Region::new(0, 0, 4, 1)));
        b.static_cell(&CellPatch::new(0, 0, "Wide").merge(3));
        let anchor = b.cell(Coord::new(0, 0)).unwrap();
        assert_eq!(anchor.border_right, 0);
        for col in 1..3 {
            let child = b.cell(Coord::new(col, 0)).unwrap();
            assert_eq!((child.border_left, child.border_right), (0, 0), "col {col}");
            assert_eq!(child.border_top, 2);
        }
        let last = b.cell(Coord::new(3, 0)).unwrap();
        assert_eq!((last.border_left, last.border_right), (0, 2));
    }

    #[test]
    fn test_writing_into_a_span_cuts_it() {
        let mut b = SheetBuilder::new(1, 8);
        b.static_cell(&CellPatch::new(0, 0, "Wide").merge(5));
        b.static_cell(&CellPatch::new(3, 0, "Cut"));

        let anchor = b.cell(Coord::new(0, 0)).unwrap();
        assert_eq!(anchor.merge_across, 2);
        let written = b.cell(Coord::new(3, 0)).unwrap();
        assert!(!written.merge_child);
        assert_eq!(written.text, "Cut");
        for col in 4..=5 {
            let released = b.cell(Coord::new(col, 0)).unwrap();
            assert!(!released.merge_child, "col {col}");
            assert_eq!(released.kind, "blank");
        }
        assert_eq!(b.cell(Coord::new(2, 0)).unwrap().border_right, 1);
    }

    #[test]
    fn test_remerge_replaces_old_span() {
        let mut b = SheetBuilder::new(1, 8);
        b.static_cell(&CellPatch::new(0, 0, "Wide").merge(5));
        b.static_cell(&CellPatch::new(0, 0, "Narrow").merge(1));
        assert_eq!(b.cell(Coord::new(0, 0)).unwrap().merge_across, 1);
        assert!(b.cell(Coord::new(1, 0)).unwrap().merge_child);
        assert!(!b.cell(Coord::new(2, 0)).unwrap().merge_child);
    }

    #[test]
    fn test_action_defaults() {
        let mut b = SheetBuilder::new(2, 2);
        b.action_cell(&ActionPatch::new(0, 0, "Go", "nav"));
        let cell = b.cell(Coord::new(0, 0)).unwrap();
        assert_eq!(cell.kind, "button");
        assert_eq!(cell.trigger, "single");
        assert!(!cell.disabled);
    }

    #[test]
    fn test_out_of_grid_patches_are_ignored() {
        let mut b = SheetBuilder::new(2, 2);
        b.static_cell(&CellPatch::new(5, 0, "x"));
        b.apply(&surface(Region::new(7, 7, 2, 2), "hero"));
        let model = b.build();
        assert!(model.cells().all(|c| c.kind == "blank" && c.surface == "sheet"));
    }
}
