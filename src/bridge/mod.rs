//! Workbook bridge: drives one grid widget mount from a [`SheetModel`].
//!
//! The core here is target-independent. It turns widget and input events into
//! [`BridgeEvent`]s, which the caller hands to [`dispatch_events`] once every
//! internal borrow is released. The browser adapter lives in `dom`.

mod config;
#[cfg(target_arch = "wasm32")]
pub mod dom;
mod interaction;
mod widget;

pub use config::{compute_cell_width, BridgeOptions, ColumnDef, RowDef, WidgetConfig};
pub use interaction::{InteractionState, Phase, SelectOutcome};
pub use widget::{CellPresentation, Capability, GridWidget};

use crate::action::{self, ActionHandler};
use crate::error::Result;
use crate::normalize::display_text;
use crate::sheet::SheetModel;
use crate::trigger::{can_fire, InteractionKind};
use crate::types::{Cell, Coord, SelectedCell};
use widget::try_capability;

/// Primary mouse button as reported by `PointerEvent.button`.
pub const LEFT_BUTTON: i16 = 0;

/// The parts of a pointer press the bridge cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerInput {
    pub button: i16,
    /// `Event.isTrusted`; synthetic presses are ignored
    pub trusted: bool,
}

impl PointerInput {
    pub fn left() -> Self {
        Self {
            button: LEFT_BUTTON,
            trusted: true,
        }
    }
}

/// Something the host must hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    SelectCell(SelectedCell),
    FireAction {
        anchor: Coord,
        kind: InteractionKind,
        cell: Cell,
    },
}

/// Result of a key press.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyOutcome {
    pub events: Vec<BridgeEvent>,
    /// The key was consumed and its default action should be prevented
    pub prevent_default: bool,
}

/// Host side of a mount: selection announcements plus action callbacks.
pub trait SheetHost: ActionHandler {
    fn on_select_cell(&mut self, selected: &SelectedCell);
}

/// Deliver `events` to `host` in order.
pub fn dispatch_events<H: SheetHost + ?Sized>(events: Vec<BridgeEvent>, host: &mut H) {
    for event in events {
        match event {
            BridgeEvent::SelectCell(selected) => host.on_select_cell(&selected),
            BridgeEvent::FireAction { cell, .. } => {
                action::dispatch(&cell, host);
            }
        }
    }
}

/// One live widget mount.
pub struct WorkbookBridge<W: GridWidget> {
    model: SheetModel,
    widget: W,
    interaction: InteractionState,
    cell_width: u32,
}

impl<W: GridWidget> std::fmt::Debug for WorkbookBridge<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkbookBridge")
            .field("rows", &self.model.row_count())
            .field("cols", &self.model.col_count())
            .field("cell_width", &self.cell_width)
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}

impl<W: GridWidget> WorkbookBridge<W> {
    /// Construct the widget for `model` and present it.
    ///
    /// Returns the mount together with the synthetic initial selection the
    /// host should announce.
    pub fn mount<F>(
        model: SheetModel,
        options: &BridgeOptions,
        cell_width: u32,
        construct: F,
    ) -> Result<(Self, Vec<BridgeEvent>)>
    where
        F: FnOnce(&WidgetConfig) -> Result<W>,
    {
        let config = WidgetConfig::new(&model, options, cell_width);
        let widget = construct(&config)?;
        let mut bridge = Self {
            model,
            widget,
            interaction: InteractionState::new(),
            cell_width,
        };
        if options.hide_index_column {
            try_capability(&mut bridge.widget, Capability::HideIndexColumn);
        }
        bridge.reapply_presentation();
        log::info!(
            "mounted {}x{} sheet at {cell_width}px",
            bridge.model.col_count(),
            bridge.model.row_count()
        );
        Ok((bridge, vec![BridgeEvent::SelectCell(SelectedCell::initial())]))
    }

    pub fn model(&self) -> &SheetModel {
        &self.model
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Paint every cell from the model. Safe to repeat.
    pub fn reapply_presentation(&mut self) -> usize {
        self.widget.begin_presentation();
        let mut painted = 0;
        for (at, cell) in self.model.entries() {
            self.widget.paint_cell(at, &CellPresentation::of(cell));
            painted += 1;
        }
        painted
    }

    /// A press on the rendered cell at `at`.
    pub fn pointer_down(&mut self, at: Coord, input: PointerInput) {
        if input.button != LEFT_BUTTON || !input.trusted {
            return;
        }
        let anchor = self.model.resolve_anchor(at);
        self.interaction.press(anchor);
        try_capability(&mut self.widget, Capability::ClearCopySelection);
    }

    /// The widget reported a selection whose top-left is `at`.
    pub fn widget_selection(&mut self, at: Coord) -> Vec<BridgeEvent> {
        let Some((anchor, cell)) = self.model.resolve(at) else {
            log::debug!("selection outside the grid at {at}");
            return Vec::new();
        };
        let SelectOutcome::Selected { pressed_here, .. } = self.interaction.select(anchor) else {
            log::debug!("suppressed initial widget selection at {at}");
            return Vec::new();
        };
        let mut events = vec![BridgeEvent::SelectCell(SelectedCell {
            label: anchor.label(),
            text: display_text(cell).to_string(),
        })];
        if pressed_here && can_fire(cell, InteractionKind::Single) {
            events.push(fire(anchor, InteractionKind::Single, cell));
        }
        events
    }

    /// Feed selections the widget reported while it was still being
    /// constructed, in arrival order. The first one is the widget's own
    /// initial selection and is consumed by the suppression guard.
    pub fn replay_selections<I>(&mut self, early: I) -> Vec<BridgeEvent>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut events = Vec::new();
        for at in early {
            events.extend(self.widget_selection(at));
        }
        events
    }

    /// A `dblclick` on the rendered cell at `at`.
    pub fn double_click(&mut self, at: Coord, trusted: bool) -> Vec<BridgeEvent> {
        if !trusted {
            return Vec::new();
        }
        match self.model.resolve(at) {
            Some((anchor, cell)) if can_fire(cell, InteractionKind::Double) => {
                vec![fire(anchor, InteractionKind::Double, cell)]
            }
            _ => Vec::new(),
        }
    }

    /// A document-level key press.
    pub fn key_down(&mut self, key: &str) -> KeyOutcome {
        if key != "Enter" {
            return KeyOutcome::default();
        }
        let target = self
            .interaction
            .enter_target()
            .and_then(|at| self.model.resolve(at));
        match target {
            Some((anchor, cell)) if can_fire(cell, InteractionKind::Enter) => KeyOutcome {
                events: vec![fire(anchor, InteractionKind::Enter, cell)],
                prevent_default: true,
            },
            _ => KeyOutcome::default(),
        }
    }

    /// Destroy the widget. Failures are logged; the model is handed back.
    pub fn unmount(mut self) -> SheetModel {
        if let Err(e) = self.widget.destroy() {
            log::warn!("widget destroy failed: {e}");
        }
        log::info!("unmounted sheet");
        self.model
    }
}

fn fire(anchor: Coord, kind: InteractionKind, cell: &Cell) -> BridgeEvent {
    log::debug!("{kind:?} fires {} at {anchor}", cell.action_type);
    BridgeEvent::FireAction {
        anchor,
        kind,
        cell: cell.clone(),
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
    use crate::sheet::{ActionPatch, SheetBuilder};
    use crate::trigger::Trigger;

    #[derive(Default)]
    struct NullWidget {
        painted: usize,
    }

    impl GridWidget for NullWidget {
        fn paint_cell(&mut self, _at: Coord, _presentation: &CellPresentation) {
            self.painted += 1;
        }

        fn destroy(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn mounted() -> WorkbookBridge<NullWidget> {
        let mut b = SheetBuilder::new(3, 4);
        b.action_cell(&ActionPatch::new(0, 0, "Home", "open-guide").merge(1));
        b.action_cell(&ActionPatch::new(2, 1, "Open", "open-post").trigger(Trigger::Enter));
        let (bridge, events) =
            WorkbookBridge::mount(b.build(), &BridgeOptions::default(), 80, |_| {
                Ok(NullWidget::default())
            })
            .unwrap();
        assert_eq!(events, vec![BridgeEvent::SelectCell(SelectedCell::initial())]);
        bridge
    }

    #[test]
    fn test_mount_paints_every_cell() {
        let bridge = mounted();
        assert_eq!(bridge.widget().painted, 12);
    }

    #[test]
    fn test_selection_on_merge_child_reports_anchor() {
        let mut bridge = mounted();
        bridge.pointer_down(Coord::new(1, 0), PointerInput::left());
        let events = bridge.widget_selection(Coord::new(1, 0));
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            BridgeEvent::SelectCell(SelectedCell {
                label: "A1".to_string(),
                text: "Home".to_string()
            })
        );
        assert!(matches!(
            events[1],
            BridgeEvent::FireAction {
                anchor: Coord { col: 0, row: 0 },
                kind: InteractionKind::Single,
                ..
            }
        ));
    }

    #[test]
    fn test_right_and_synthetic_presses_are_ignored() {
        let mut bridge = mounted();
        bridge.pointer_down(
            Coord::new(0, 0),
            PointerInput {
                button: 2,
                trusted: true,
            },
        );
        bridge.pointer_down(
            Coord::new(0, 0),
            PointerInput {
                button: LEFT_BUTTON,
                trusted: false,
            },
        );
        assert_eq!(bridge.interaction().phase(), Phase::Idle);
    }

    #[test]
    fn test_enter_prevents_default_only_when_firing() {
        let mut bridge = mounted();
        bridge.pointer_down(Coord::new(2, 1), PointerInput::left());
        bridge.widget_selection(Coord::new(2, 1));
        assert!(!bridge.key_down("Tab").prevent_default);
        let outcome = bridge.key_down("Enter");
        assert!(outcome.prevent_default);
        assert_eq!(outcome.events.len(), 1);

        bridge.pointer_down(Coord::new(3, 2), PointerInput::left());
        bridge.widget_selection(Coord::new(3, 2));
        assert_eq!(bridge.key_down("Enter"), KeyOutcome::default());
    }
}
