//! Cell normalization and the pure presentation helpers derived from a cell.
//!
//! `normalize` is total: any JSON value, however malformed, yields a
//! well-formed [`Cell`]. Each field is coerced on its own so a single bad
//! field never discards the rest of the object.

use serde_json::{Map, Number, Value};

use crate::types::{Cell, DEFAULT_BORDER, KIND_TEXT, SURFACE_SHEET};

/// Base class token carried by every rendered cell.
pub const BASE_CLASS: &str = "app-excel-cell";

/// Convert arbitrary input into the canonical cell shape.
pub fn normalize(raw: &Value) -> Cell {
    let Some(obj) = raw.as_object() else {
        return Cell::blank();
    };

    let text = coerce_string(obj.get("text"));
    let formula_text = match obj.get("formulaText") {
        Some(Value::String(s)) => s.clone(),
        _ => text.clone(),
    };
    let merge_child = coerce_bool(obj.get("mergeChild"));
    let merge_across = if merge_child {
        0
    } else {
        coerce_count(obj.get("mergeAcross"), 0)
    };

    Cell {
        kind: coerce_string_or(obj.get("kind"), KIND_TEXT),
        text,
        surface: coerce_string_or(obj.get("surface"), SURFACE_SHEET),
        border_top: coerce_count(obj.get("borderTop"), DEFAULT_BORDER),
        border_right: coerce_count(obj.get("borderRight"), DEFAULT_BORDER),
        border_bottom: coerce_count(obj.get("borderBottom"), DEFAULT_BORDER),
        border_left: coerce_count(obj.get("borderLeft"), DEFAULT_BORDER),
        action_type: coerce_string(obj.get("actionType")),
        action_payload: coerce_payload(obj.get("actionPayload")),
        trigger: coerce_string(obj.get("trigger")),
        active: coerce_bool(obj.get("active")),
        disabled: coerce_bool(obj.get("disabled")),
        formula_text,
        merge_across,
        merge_child,
    }
}

/// Normalize every element of a JSON array; anything else yields no cells.
pub fn normalize_all(raw: &Value) -> Vec<Cell> {
    raw.as_array()
        .map(|items| items.iter().map(normalize).collect())
        .unwrap_or_default()
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Whole floats print without a fraction (`1.0` -> `"1"`, `-0.0` -> `"0"`).
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

fn coerce_string_or(value: Option<&Value>, default: &str) -> String {
    let s = coerce_string(value);
    if s.is_empty() {
        default.to_string()
    } else {
        s
    }
}

/// Only a literal JSON `true` counts; `"true"`, `1` and friends do not.
fn coerce_bool(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// Number or numeric string, floored and clamped to be non-negative.
// The f64 -> u32 cast is bounded: the value is floored, clamped to [0, u32::MAX] first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_count(value: Option<&Value>, default: u32) -> u32 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => n.floor().clamp(0.0, f64::from(u32::MAX)) as u32,
        _ => default,
    }
}

fn coerce_payload(value: Option<&Value>) -> Option<Map<String, Value>> {
    match value {
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    }
}

/// Text shown in the grid: `formulaText` when set, else `text`.
pub fn display_text(cell: &Cell) -> &str {
    if cell.formula_text.is_empty() {
        &cell.text
    } else {
        &cell.formula_text
    }
}

/// Ordered class tokens for a rendered cell.
pub fn class_names(cell: &Cell) -> Vec<String> {
    let mut tokens = vec![
        BASE_CLASS.to_string(),
        format!("kind-{}", cell.kind),
        format!("surface-{}", cell.surface),
    ];
    if cell.active {
        tokens.push("is-active".to_string());
    }
    if cell.disabled {
        tokens.push("is-disabled".to_string());
    }
    if cell.has_action() {
        tokens.push("has-action".to_string());
    }
    if cell.is_merge_anchor() {
        tokens.push("is-merged-parent".to_string());
    }
    if cell.merge_child {
        tokens.push("is-merged-child".to_string());
    }
    tokens
}

/// Class tokens joined for `className`.
pub fn class_name(cell: &Cell) -> String {
    class_names(cell).join(" ")
}

/// Border widths and merge span as presented, independent of stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub border_top: u8,
    pub border_right: u8,
    pub border_bottom: u8,
    pub border_left: u8,
    pub merge_span: u32,
}

impl CellStyle {
    /// CSS custom properties consumed by the sheet stylesheet.
    pub fn declarations(&self) -> [(&'static str, String); 5] {
        [
            ("--cell-border-top", format!("{}px", self.border_top)),
            ("--cell-border-right", format!("{}px", self.border_right)),
            ("--cell-border-bottom", format!("{}px", self.border_bottom)),
            ("--cell-border-left", format!("{}px", self.border_left)),
            ("--merge-span", self.merge_span.to_string()),
        ]
    }
}

/// Presented widths are always 1 or 2.
pub fn clamp_border(width: u32) -> u8 {
    if width >= 2 {
        2
    } else {
        1
    }
}

pub fn presentation_style(cell: &Cell) -> CellStyle {
    CellStyle {
        border_top: clamp_border(cell.border_top),
        border_right: clamp_border(cell.border_right),
        border_bottom: clamp_border(cell.border_bottom),
        border_left: clamp_border(cell.border_left),
        merge_span: cell.merge_across.saturating_add(1).max(1),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_objects_are_blank() {
        for raw in [json!(null), json!(3), json!("cell"), json!([1, 2]), json!(true)] {
            assert_eq!(normalize(&raw), Cell::blank(), "{raw}");
        }
    }

    #[test]
    fn test_object_defaults() {
        let cell = normalize(&json!({}));
        assert_eq!(cell.kind, "text");
        assert_eq!(cell.surface, "sheet");
        assert_eq!(cell.border_left, 1);
        assert!(cell.action_payload.is_none());
    }

    #[test]
    fn test_strict_booleans() {
        let cell = normalize(&json!({"active": "true", "disabled": 1, "mergeChild": "yes"}));
        assert!(!cell.active);
        assert!(!cell.disabled);
        assert!(!cell.merge_child);
    }

    #[test]
    fn test_counts_are_floored_and_non_negative() {
        let cell = normalize(&json!({
            "mergeAcross": 2.9,
            "borderTop": -4,
            "borderBottom": "7",
            "borderRight": "wide",
            "borderLeft": null
        }));
        assert_eq!(cell.merge_across, 2);
        assert_eq!(cell.border_top, 0);
        assert_eq!(cell.border_bottom, 7);
        assert_eq!(cell.border_right, 1);
        assert_eq!(cell.border_left, 1);
    }

    #[test]
    fn test_formula_text_falls_back_to_text() {
        let cell = normalize(&json!({"text": "Go"}));
        assert_eq!(cell.formula_text, "Go");
        let cell = normalize(&json!({"text": "Go", "formulaText": "=GO()"}));
        assert_eq!(display_text(&cell), "=GO()");
    }

    #[test]
    fn test_merge_child_drops_span() {
        let cell = normalize(&json!({"mergeChild": true, "mergeAcross": 4}));
        assert!(cell.merge_child);
        assert_eq!(cell.merge_across, 0);
    }

    #[test]
    fn test_class_tokens_in_order() {
        let cell = normalize(&json!({
            "kind": "button",
            "surface": "hero",
            "active": true,
            "actionType": "nav",
            "mergeAcross": 2
        }));
        assert_eq!(
            class_name(&cell),
            "app-excel-cell kind-button surface-hero is-active has-action is-merged-parent"
        );
    }

    #[test]
    fn test_border_clamp() {
        let mut cell = Cell::blank();
        cell.border_top = 0;
        cell.border_bottom = 7;
        let style = presentation_style(&cell);
        assert_eq!(style.border_top, 1);
        assert_eq!(style.border_bottom, 2);
        assert_eq!(style.merge_span, 1);
    }
}
