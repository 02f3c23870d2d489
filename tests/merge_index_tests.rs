//! Tests for coordinate lookups and merge-anchor resolution on built sheets.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use appexcel::sheet::{CellPatch, SheetBuilder, SheetModel};
use appexcel::Coord;
use common::assert_sound;

/// 6×8 grid with one anchor at (2,3) spanning three columns.
fn spanned() -> SheetModel {
    let mut b = SheetBuilder::new(6, 8);
    b.static_cell(&CellPatch::new(2, 3, "anchor").merge(3));
    b.build()
}

#[test]
fn test_every_spanned_coordinate_resolves_to_anchor() {
    let model = spanned();
    let anchor = Coord::new(2, 3);
    for col in 2..=5 {
        assert_eq!(model.resolve_anchor(Coord::new(col, 3)), anchor, "col {col}");
    }
    assert_eq!(model.resolve_anchor(Coord::new(6, 3)), Coord::new(6, 3));
    assert_eq!(model.resolve_anchor(Coord::new(3, 2)), Coord::new(3, 2));
    assert_sound(&model);
}

#[test]
fn test_merge_index_holds_only_children() {
    let model = spanned();
    let index = model.merge_index();
    assert_eq!(index.len(), 3);
    assert_eq!(index.anchor_of(Coord::new(2, 3)), None);
    assert_eq!(index.anchor_of(Coord::new(4, 3)), Some(Coord::new(2, 3)));
    assert_eq!(index.anchor_key("5:3").as_deref(), Some("2:3"));
    assert_eq!(index.anchor_key("7:3"), None);

    let keys = index.to_key_map();
    assert_eq!(
        keys.into_iter().collect::<Vec<_>>(),
        vec![
            ("3:3".to_string(), "2:3".to_string()),
            ("4:3".to_string(), "2:3".to_string()),
            ("5:3".to_string(), "2:3".to_string()),
        ]
    );
}

#[test]
fn test_resolve_returns_anchor_cell() {
    let model = spanned();
    let (anchor, cell) = model.resolve(Coord::new(5, 3)).unwrap();
    assert_eq!(anchor, Coord::new(2, 3));
    assert_eq!(cell.text, "anchor");
    assert_eq!(anchor.label(), "C4");
    assert!(model.resolve(Coord::new(8, 0)).is_none());
}

#[test]
fn test_cell_index_covers_every_key() {
    let model = spanned();
    let index = model.cell_index();
    assert_eq!(index.len(), 48);
    assert!(index.contains("7:5"));
    assert!(!index.contains("8:5"));
    assert_eq!(index.position("1:1"), Some(9));
    assert_eq!(model.cell_by_key("2:3").unwrap().text, "anchor");
    assert!(model.cell_by_key("2-3").is_none());
}

#[test]
fn test_sheet_view_serializes_indexes() {
    let model = spanned();
    let view = serde_json::to_value(model.view()).unwrap();
    assert_eq!(view["rowCount"], 6);
    assert_eq!(view["colCount"], 8);
    assert_eq!(view["matrix"].as_array().unwrap().len(), 6);
    assert_eq!(view["matrix"][3][2]["mergeAcross"], 3);
    assert_eq!(view["mergeAnchorIndex"]["4:3"], "2:3");
    assert_eq!(view["mergeCells"]["C4"], serde_json::json!([4, 1]));
}
