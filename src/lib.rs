//! appexcel - spreadsheet-grid presentation layer for the web
//!
//! Turns forum state into a read-only spreadsheet surface:
//! - Cell normalization into one fixed-schema cell record
//! - Sheet layout from ordered region patches, with horizontal merges
//! - Coordinate and merge-anchor lookups on the built grid
//! - A WebAssembly bridge that mounts a DOM grid widget and keeps its
//!   cells styled across re-renders
//! - Trigger gating and action dispatch back to the host
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { AppExcel } from 'appexcel';
//! await init();
//! const sheet = new AppExcel(container, {
//!   onSelectCell: ({ label, text }) => formulaBar.set(label, text),
//!   onOpenPost: (postId, boardId) => router.open(postId, boardId),
//! }, { minCellWidth: 72 });
//! sheet.setSnapshot(forumSnapshot);
//! ```

pub mod action;
pub mod bridge;
pub mod cell_ref;
pub mod error;
pub mod forum;
pub mod logging;
pub mod normalize;
pub mod sheet;
pub mod trigger;
pub mod types;

use serde::Serialize;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use bridge::dom::AppExcel;
pub use error::{AppExcelError, Result};

pub use types::*;

fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Normalize an arbitrary JS value into the canonical cell shape.
///
/// # Errors
/// Returns an error only if the value cannot be read or the cell written back.
#[wasm_bindgen(js_name = "normalizeCell")]
pub fn normalize_cell(raw: JsValue) -> std::result::Result<JsValue, JsValue> {
    let raw: serde_json::Value = serde_wasm_bindgen::from_value(raw).unwrap_or_default();
    to_js(&normalize::normalize(&raw))
}

/// Build a sheet from a patch script and return its matrix and indexes.
///
/// # Errors
/// Returns an error if `input` is not a valid patch script.
#[wasm_bindgen(js_name = "buildSheet")]
pub fn build_sheet(input: JsValue) -> std::result::Result<JsValue, JsValue> {
    let input: sheet::SheetInput = serde_wasm_bindgen::from_value(input)
        .map_err(|e| JsValue::from_str(&format!("Invalid sheet input: {e}")))?;
    let model = sheet::build(&input);
    to_js(&model.view())
}

/// Lay a forum snapshot out as a patch script.
///
/// # Errors
/// Returns an error if `snapshot` cannot be decoded.
#[wasm_bindgen(js_name = "layoutForum")]
pub fn layout_forum(snapshot: JsValue) -> std::result::Result<JsValue, JsValue> {
    let snapshot: forum::ForumSnapshot = serde_wasm_bindgen::from_value(snapshot)
        .map_err(|e| JsValue::from_str(&format!("Invalid snapshot: {e}")))?;
    to_js(&forum::layout(&snapshot))
}

/// A1-style label for a zero-based coordinate.
#[must_use]
#[wasm_bindgen(js_name = "cellLabel")]
pub fn cell_label(col: u32, row: u32) -> String {
    cell_ref::cell_label(col, row)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
