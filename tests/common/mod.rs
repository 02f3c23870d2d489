//! Common test utilities: a recording grid widget, a recording host, and
//! assertion helpers for built sheets.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::{Map, Value};

use appexcel::action::ActionHandler;
use appexcel::bridge::{
    BridgeEvent, BridgeOptions, CellPresentation, Capability, GridWidget, SheetHost,
    WorkbookBridge,
};
use appexcel::sheet::SheetModel;
use appexcel::{AppExcelError, Cell, Coord, Result, SelectedCell};

// ============================================================================
// Recording widget
// ============================================================================

/// Shared call log, readable after the widget has been moved into a bridge
/// or dropped by `unmount`.
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// In-memory stand-in for the DOM grid widget.
#[derive(Default)]
pub struct RecordingWidget {
    pub log: CallLog,
    pub painted: HashMap<Coord, CellPresentation>,
    pub passes: usize,
    pub capabilities: HashSet<Capability>,
    pub fail_invoke: bool,
    pub fail_destroy: bool,
}

impl RecordingWidget {
    pub fn with_capabilities(log: CallLog, capabilities: &[Capability]) -> Self {
        Self {
            log,
            capabilities: capabilities.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl GridWidget for RecordingWidget {
    fn begin_presentation(&mut self) {
        self.passes += 1;
    }

    fn paint_cell(&mut self, at: Coord, presentation: &CellPresentation) {
        self.painted.insert(at, presentation.clone());
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn invoke(&mut self, capability: Capability) -> Result<()> {
        self.log.borrow_mut().push(format!("invoke {capability:?}"));
        if self.fail_invoke {
            return Err(AppExcelError::Widget(format!("{capability:?} exploded")));
        }
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        self.log.borrow_mut().push("destroy".to_string());
        if self.fail_destroy {
            return Err(AppExcelError::Widget("destroy exploded".to_string()));
        }
        Ok(())
    }
}

/// Mount `model` on a recording widget with every capability available.
pub fn mount(model: SheetModel) -> (WorkbookBridge<RecordingWidget>, CallLog, Vec<BridgeEvent>) {
    mount_with(model, |log| {
        RecordingWidget::with_capabilities(
            log,
            &[Capability::HideIndexColumn, Capability::ClearCopySelection],
        )
    })
}

pub fn mount_with(
    model: SheetModel,
    make: impl FnOnce(CallLog) -> RecordingWidget,
) -> (WorkbookBridge<RecordingWidget>, CallLog, Vec<BridgeEvent>) {
    let log = CallLog::default();
    let widget = make(Rc::clone(&log));
    let (bridge, events) =
        WorkbookBridge::mount(model, &BridgeOptions::default(), 80, move |_| Ok(widget))
            .expect("mount");
    (bridge, log, events)
}

// ============================================================================
// Recording host
// ============================================================================

/// Host that writes every callback it receives as one line.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<String>,
}

impl ActionHandler for RecordingHost {
    fn open_guide(&mut self) {
        self.calls.push("open_guide".to_string());
    }

    fn toggle_theme(&mut self) {
        self.calls.push("toggle_theme".to_string());
    }

    fn logout(&mut self) {
        self.calls.push("logout".to_string());
    }

    fn open_notifications(&mut self) {
        self.calls.push("open_notifications".to_string());
    }

    fn open_composer(&mut self) {
        self.calls.push("open_composer".to_string());
    }

    fn select_board(&mut self, board_id: &str) {
        self.calls.push(format!("select_board {board_id}"));
    }

    fn sort(&mut self, mode: &str) {
        self.calls.push(format!("sort {mode}"));
    }

    fn page(&mut self, page: u32) {
        self.calls.push(format!("page {page}"));
    }

    fn open_post(&mut self, post_id: &str, board_id: &str) {
        self.calls.push(format!("open_post {post_id} {board_id}"));
    }

    fn on_action(&mut self, action_type: &str, payload: Option<&Map<String, Value>>, cell: &Cell) {
        let payload = payload.map_or_else(|| "null".to_string(), |p| Value::Object(p.clone()).to_string());
        self.calls
            .push(format!("action {action_type} {payload} {}", cell.text));
    }
}

impl SheetHost for RecordingHost {
    fn on_select_cell(&mut self, selected: &SelectedCell) {
        self.calls
            .push(format!("select {} {}", selected.label, selected.text));
    }
}

// ============================================================================
// Assertions
// ============================================================================

/// Number of `FireAction` events in `events`.
pub fn fired(events: &[BridgeEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, BridgeEvent::FireAction { .. }))
        .count()
}

pub fn assert_sound(model: &SheetModel) {
    let problems = model.check_invariants();
    assert!(problems.is_empty(), "merge invariants violated: {problems:?}");
}

pub fn cell(model: &SheetModel, col: u32, row: u32) -> &Cell {
    model
        .cell(Coord::new(col, row))
        .unwrap_or_else(|| panic!("no cell at {col}:{row}"))
}
