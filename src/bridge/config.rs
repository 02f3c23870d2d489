//! Bridge options and the widget construction config derived from a model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppExcelError, Result};
use crate::sheet::SheetModel;

/// Host-tunable bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeOptions {
    /// Narrowest a column may get, in CSS pixels
    pub min_cell_width: u32,
    /// Fixed row height in CSS pixels
    pub row_height: u32,
    /// Minimum table height in CSS pixels
    pub min_table_height: u32,
    /// Global name of the widget factory (`window[widgetGlobal](el, config)`)
    pub widget_global: String,
    /// Hide the widget's row-number column after mount
    pub hide_index_column: bool,
    /// `log` level for the console sink ("off", "error", "warn", "info", "debug", "trace")
    pub log_level: String,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            min_cell_width: 72,
            row_height: 24,
            min_table_height: 640,
            widget_global: "jspreadsheet".to_string(),
            hide_index_column: true,
            log_level: "warn".to_string(),
        }
    }
}

impl BridgeOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AppExcelError::Config(e.to_string()))
    }

    /// Parsed log level; unknown names fall back to `Warn`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    }

    /// Total table height for `row_count` rows.
    pub fn table_height(&self, row_count: u32) -> u32 {
        row_count
            .saturating_mul(self.row_height)
            .saturating_add(2)
            .max(self.min_table_height)
    }
}

/// Uniform per-column width: `max(min_width, ceil(container_width / col_count))`.
// Container widths are CSS pixels; the ratio is clamped into u32 range before the cast.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_cell_width(container_width: f64, col_count: u32, min_width: u32) -> u32 {
    if !container_width.is_finite() || container_width <= 0.0 || col_count == 0 {
        return min_width;
    }
    let per_col = (container_width / f64::from(col_count))
        .ceil()
        .clamp(0.0, f64::from(u32::MAX)) as u32;
    per_col.max(min_width)
}

/// One column definition as the widget expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub width: u32,
    pub read_only: bool,
}

/// One row definition as the widget expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDef {
    pub height: String,
}

/// Construction config handed to the widget factory.
///
/// Column widths are baked in here; a width change means a new widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub data: Vec<Vec<String>>,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<RowDef>,
    pub default_row_height: u32,
    pub merge_cells: BTreeMap<String, [u32; 2]>,
    pub min_dimensions: [u32; 2],
    pub table_overflow: bool,
    pub table_width: String,
    pub table_height: String,
    pub editable: bool,
    pub column_sorting: bool,
    pub column_drag: bool,
    pub column_resize: bool,
    pub row_drag: bool,
    pub row_resize: bool,
    pub allow_insert_row: bool,
    pub allow_manual_insert_row: bool,
    pub allow_insert_column: bool,
    pub allow_manual_insert_column: bool,
    pub allow_delete_row: bool,
    pub allow_delete_column: bool,
    pub allow_rename_column: bool,
    pub allow_comments: bool,
    pub allow_export: bool,
    /// Cell width in CSS pixels, also exposed as an instance-scoped CSS variable
    #[serde(skip)]
    pub cell_width: u32,
}

impl WidgetConfig {
    pub fn new(model: &SheetModel, options: &BridgeOptions, cell_width: u32) -> Self {
        let col_count = model.col_count();
        let row_count = model.row_count();
        let columns = (0..col_count)
            .map(|_| ColumnDef {
                kind: "text",
                width: cell_width,
                read_only: true,
            })
            .collect();
        let rows = (0..row_count)
            .map(|_| RowDef {
                height: format!("{}px", options.row_height),
            })
            .collect();
        Self {
            data: model.display_rows(),
            columns,
            rows,
            default_row_height: options.row_height,
            merge_cells: model.widget_merge_cells(),
            min_dimensions: [col_count, row_count],
            table_overflow: true,
            table_width: format!("{}px", col_count.saturating_mul(cell_width)),
            table_height: format!("{}px", options.table_height(row_count)),
            editable: false,
            column_sorting: false,
            column_drag: false,
            column_resize: false,
            row_drag: false,
            row_resize: false,
            allow_insert_row: false,
            allow_manual_insert_row: false,
            allow_insert_column: false,
            allow_manual_insert_column: false,
            allow_delete_row: false,
            allow_delete_column: false,
            allow_rename_column: false,
            allow_comments: false,
            allow_export: false,
            cell_width,
        }
    }
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
    use crate::sheet::{CellPatch, SheetBuilder};

    #[test]
    fn test_cell_width_rounds_up_and_respects_minimum() {
        assert_eq!(compute_cell_width(1000.0, 12, 72), 84);
        assert_eq!(compute_cell_width(1200.0, 12, 72), 100);
        assert_eq!(compute_cell_width(300.0, 12, 72), 72);
        assert_eq!(compute_cell_width(0.0, 12, 72), 72);
        assert_eq!(compute_cell_width(f64::NAN, 12, 72), 72);
    }

    #[test]
    fn test_table_height_has_floor() {
        let options = BridgeOptions::default();
        assert_eq!(options.table_height(10), 640);
        assert_eq!(options.table_height(40), 40 * 24 + 2);
    }

    #[test]
    fn test_options_fill_missing_fields() {
        let options = BridgeOptions::from_json(r#"{"minCellWidth": 90, "extra": 1}"#).unwrap();
        assert_eq!(options.min_cell_width, 90);
        assert_eq!(options.row_height, 24);
        assert_eq!(options.widget_global, "jspreadsheet");
        assert!(BridgeOptions::from_json("[").is_err());
    }

    #[test]
    fn test_config_serializes_widget_shape() {
        let mut b = SheetBuilder::new(2, 4);
        b.static_cell(&CellPatch::new(0, 0, "Title").merge(2));
        let config = WidgetConfig::new(&b.build(), &BridgeOptions::default(), 80);
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["tableWidth"], "320px");
        assert_eq!(json["tableHeight"], "640px");
        assert_eq!(json["columns"][0]["type"], "text");
        assert_eq!(json["columns"][3]["readOnly"], true);
        assert_eq!(json["rows"][1]["height"], "24px");
        assert_eq!(json["defaultRowHeight"], 24);
        assert_eq!(json["mergeCells"]["A1"], serde_json::json!([3, 1]));
        assert_eq!(json["data"][0][0], "Title");
        assert_eq!(json["columnSorting"], false);
        assert!(json.get("cellWidth").is_none());
    }
}
