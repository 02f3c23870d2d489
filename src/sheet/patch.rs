//! Region patches: the primitives a layout script issues to the builder.
//!
//! Patches deserialize from `{"op": "...", ...}` objects so a JS host can
//! ship a layout script as plain data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::trigger::Trigger;
use crate::types::{Coord, Region};

/// Full input of one sheet build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInput {
    pub row_count: u32,
    pub col_count: u32,
    #[serde(default)]
    pub patches: Vec<Patch>,
}

impl SheetInput {
    pub fn new(row_count: u32, col_count: u32) -> Self {
        Self {
            row_count,
            col_count,
            patches: Vec::new(),
        }
    }

    pub fn push(&mut self, patch: impl Into<Patch>) -> &mut Self {
        self.patches.push(patch.into());
        self
    }
}

/// One ordered builder operation. Later patches win on the fields they set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Patch {
    Surface(SurfacePatch),
    Outline(OutlinePatch),
    Cell(CellPatch),
    Action(ActionPatch),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfacePatch {
    pub region: Region,
    pub surface: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlinePatch {
    pub region: Region,
}

/// Static content at one coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPatch {
    pub col: u32,
    pub row: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_across: Option<u32>,
}

impl CellPatch {
    pub fn new(col: u32, row: u32, text: impl Into<String>) -> Self {
        Self {
            col,
            row,
            text: text.into(),
            formula_text: None,
            kind: None,
            surface: None,
            merge_across: None,
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn surface(mut self, surface: impl Into<String>) -> Self {
        self.surface = Some(surface.into());
        self
    }

    pub fn formula(mut self, formula_text: impl Into<String>) -> Self {
        self.formula_text = Some(formula_text.into());
        self
    }

    pub fn merge(mut self, across: u32) -> Self {
        self.merge_across = Some(across);
        self
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.col, self.row)
    }
}

/// Static content plus a configured action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPatch {
    pub col: u32,
    pub row: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_across: Option<u32>,
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_payload: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub disabled: bool,
}

impl ActionPatch {
    pub fn new(col: u32, row: u32, text: impl Into<String>, action_type: impl Into<String>) -> Self {
        Self {
            col,
            row,
            text: text.into(),
            formula_text: None,
            kind: None,
            surface: None,
            merge_across: None,
            action_type: action_type.into(),
            action_payload: None,
            trigger: None,
            active: false,
            disabled: false,
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn surface(mut self, surface: impl Into<String>) -> Self {
        self.surface = Some(surface.into());
        self
    }

    pub fn merge(mut self, across: u32) -> Self {
        self.merge_across = Some(across);
        self
    }

    /// Attach a payload. Non-object values are dropped.
    pub fn payload(mut self, payload: Value) -> Self {
        self.action_payload = match payload {
            Value::Object(map) => Some(map),
            _ => None,
        };
        self
    }

    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger.as_str().to_string());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.col, self.row)
    }
}

impl From<SurfacePatch> for Patch {
    fn from(p: SurfacePatch) -> Self {
        Patch::Surface(p)
    }
}

impl From<OutlinePatch> for Patch {
    fn from(p: OutlinePatch) -> Self {
        Patch::Outline(p)
    }
}

impl From<CellPatch> for Patch {
    fn from(p: CellPatch) -> Self {
        Patch::Cell(p)
    }
}

impl From<ActionPatch> for Patch {
    fn from(p: ActionPatch) -> Self {
        Patch::Action(p)
    }
}

/// `surface` over `region`.
pub fn surface(region: Region, surface: impl Into<String>) -> Patch {
    Patch::Surface(SurfacePatch {
        region,
        surface: surface.into(),
    })
}

/// Thick border on the perimeter of `region`.
pub fn outline(region: Region) -> Patch {
    Patch::Outline(OutlinePatch { region })
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
    use serde_json::json;

    #[test]
    fn test_patch_script_from_json() {
        let input: SheetInput = serde_json::from_value(json!({
            "rowCount": 4,
            "colCount": 6,
            "patches": [
                {"op": "surface", "region": {"col": 0, "row": 0, "width": 6, "height": 1}, "surface": "hero"},
                {"op": "outline", "region": {"col": 0, "row": 0, "width": 6, "height": 4}},
                {"op": "cell", "col": 0, "row": 0, "text": "Title", "mergeAcross": 3},
                {"op": "action", "col": 1, "row": 2, "text": "Go", "actionType": "nav", "trigger": "double"}
            ]
        }))
        .unwrap();

        assert_eq!(input.patches.len(), 4);
        match &input.patches[3] {
            Patch::Action(p) => {
                assert_eq!(p.action_type, "nav");
                assert_eq!(p.trigger.as_deref(), Some("double"));
                assert!(!p.active);
            }
            other => panic!("unexpected patch {other:?}"),
        }
    }

    #[test]
    fn test_payload_must_be_object() {
        let patch = ActionPatch::new(0, 0, "x", "page").payload(json!(3));
        assert!(patch.action_payload.is_none());
        let patch = ActionPatch::new(0, 0, "x", "page").payload(json!({"page": 3}));
        assert_eq!(patch.action_payload.unwrap()["page"], json!(3));
    }
}
