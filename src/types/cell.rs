use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind tag of a freshly allocated, untouched grid cell.
pub const KIND_BLANK: &str = "blank";
/// Kind tag used when an object omits `kind`.
pub const KIND_TEXT: &str = "text";
/// Kind tag of clickable cells written by action patches.
pub const KIND_BUTTON: &str = "button";
/// Kind tag of cells absorbed into an anchor's horizontal span.
pub const KIND_MERGE_CHILD: &str = "merge-child";
/// Surface every cell starts on.
pub const SURFACE_SHEET: &str = "sheet";
/// Stored border width when nothing else was requested.
pub const DEFAULT_BORDER: u32 = 1;
/// Border width used for region outlines.
pub const OUTLINE_BORDER: u32 = 2;

/// Canonical grid cell.
///
/// Every cell in a built sheet has exactly this shape. Values are produced by
/// [`crate::normalize::normalize`] or by the sheet builder, never partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Semantic role ("text", "button", "table-header", "merge-child", ...)
    pub kind: String,
    /// Display text (empty for merge children)
    pub text: String,
    /// Visual zone ("hero", "panel", "table", ...)
    pub surface: String,
    /// Raw stored border widths; clamped to 1..=2 only when presented
    pub border_top: u32,
    pub border_right: u32,
    pub border_bottom: u32,
    pub border_left: u32,
    /// Empty means the cell is inert
    pub action_type: String,
    /// Structured data interpreted by the action dispatcher
    pub action_payload: Option<Map<String, Value>>,
    /// "single" | "double" | "enter" | "double-enter"; empty never fires
    pub trigger: String,
    pub active: bool,
    pub disabled: bool,
    /// Shown in place of `text` when non-empty
    pub formula_text: String,
    /// Columns this anchor spans to its right
    pub merge_across: u32,
    /// True when absorbed into a neighbouring anchor's span
    pub merge_child: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            kind: KIND_BLANK.to_string(),
            text: String::new(),
            surface: SURFACE_SHEET.to_string(),
            border_top: DEFAULT_BORDER,
            border_right: DEFAULT_BORDER,
            border_bottom: DEFAULT_BORDER,
            border_left: DEFAULT_BORDER,
            action_type: String::new(),
            action_payload: None,
            trigger: String::new(),
            active: false,
            disabled: false,
            formula_text: String::new(),
            merge_across: 0,
            merge_child: false,
        }
    }
}

impl Cell {
    /// The canonical blank cell.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Whether the cell carries a configured action.
    pub fn has_action(&self) -> bool {
        !self.action_type.is_empty()
    }

    /// Whether the cell anchors a horizontal merge.
    pub fn is_merge_anchor(&self) -> bool {
        self.merge_across > 0 && !self.merge_child
    }

    /// Serialize back into the loosely-typed shape the normalizer accepts.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
