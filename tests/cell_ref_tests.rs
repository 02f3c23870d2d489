//! Tests for coordinate keys and A1 labels.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use test_case::test_case;

use appexcel::cell_ref::{cell_label, coord_key, parse_cell_label, parse_coord_key};
use appexcel::Coord;

#[test_case(0, 0 => "A1" ; "origin")]
#[test_case(2, 3 => "C4" ; "anchor")]
#[test_case(25, 0 => "Z1" ; "last single letter")]
#[test_case(26, 9 => "AA10" ; "first double letter")]
#[test_case(255, 1999 => "IV2000" ; "largest grid")]
fn test_cell_label(col: u32, row: u32) -> String {
    cell_label(col, row)
}

#[test_case("A1" => Some((0, 0)) ; "origin")]
#[test_case("$C$4" => Some((2, 3)) ; "absolute")]
#[test_case("iv2000" => Some((255, 1999)) ; "lower case")]
#[test_case("A0" => None ; "row zero")]
#[test_case("1A" => None ; "digits first")]
#[test_case("" => None ; "empty")]
fn test_parse_cell_label(label: &str) -> Option<(u32, u32)> {
    parse_cell_label(label)
}

#[test]
fn test_coord_keys() {
    assert_eq!(coord_key(3, 7), "3:7");
    assert_eq!(parse_coord_key(" 3:7 "), Some((3, 7)));
    assert_eq!(parse_coord_key("3:-1"), None);
    assert_eq!(parse_coord_key("37"), None);
    assert_eq!(Coord::new(3, 7).key(), "3:7");
    assert_eq!(Coord::new(3, 7).to_string(), "3:7");
}

#[test]
fn test_labels_round_trip_across_grid() {
    for col in [0, 1, 25, 26, 51, 52, 255] {
        for row in [0, 1, 99, 1999] {
            let label = cell_label(col, row);
            assert_eq!(parse_cell_label(&label), Some((col, row)), "{label}");
        }
    }
}
