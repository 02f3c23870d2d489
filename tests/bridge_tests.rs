//! Tests for the workbook bridge against a recording widget.
//!
//! Covers mount presentation, press/selection correlation, double-click and
//! Enter triggers, optional widget capabilities, and teardown.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;
mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use appexcel::bridge::{
    dispatch_events, BridgeEvent, BridgeOptions, Capability, PointerInput, WorkbookBridge,
    LEFT_BUTTON,
};
use appexcel::trigger::InteractionKind;
use appexcel::{Coord, SelectedCell};
use common::{fired, mount, mount_with, RecordingHost, RecordingWidget};
use fixtures::{go_sheet, trigger_row};

fn click(bridge: &mut WorkbookBridge<RecordingWidget>, col: u32, row: u32) -> Vec<BridgeEvent> {
    let at = Coord::new(col, row);
    bridge.pointer_down(at, PointerInput::left());
    bridge.widget_selection(at)
}

// ============================================================================
// Mount and presentation
// ============================================================================

#[test]
fn test_mount_announces_initial_selection() {
    let (bridge, log, events) = mount(go_sheet());
    assert_eq!(events, vec![BridgeEvent::SelectCell(SelectedCell::initial())]);
    assert_eq!(*log.borrow(), vec!["invoke HideIndexColumn".to_string()]);
    assert_eq!(bridge.widget().passes, 1);
    assert_eq!(bridge.widget().painted.len(), 25);
    assert_eq!(bridge.cell_width(), 80);
}

#[test]
fn test_presentation_carries_classes_and_merge_span() {
    let (bridge, _, _) = mount(go_sheet());
    let anchor = &bridge.widget().painted[&Coord::new(0, 0)];
    assert_eq!(anchor.text, "Go");
    assert!(anchor.class_name.contains("has-action"));
    assert_eq!(anchor.style.merge_span, 3);
    let child = &bridge.widget().painted[&Coord::new(1, 0)];
    assert!(child.class_name.contains("is-merged-child"));
    assert_eq!(child.text, "");
}

#[test]
fn test_reapply_is_idempotent() {
    let (mut bridge, _, _) = mount(trigger_row());
    let first = bridge.widget().painted.clone();
    assert_eq!(bridge.reapply_presentation(), 24);
    assert_eq!(bridge.reapply_presentation(), 24);
    assert_eq!(bridge.widget().passes, 3);
    assert_eq!(bridge.widget().painted, first);
}

// ============================================================================
// Single trigger
// ============================================================================

#[test]
fn test_initial_widget_selection_is_suppressed() {
    let (mut bridge, _, _) = mount(go_sheet());
    assert!(bridge.widget_selection(Coord::new(0, 0)).is_empty());

    let events = bridge.widget_selection(Coord::new(3, 3));
    assert_eq!(
        events,
        vec![BridgeEvent::SelectCell(SelectedCell {
            label: "D4".to_string(),
            text: String::new(),
        })]
    );
}

#[test]
fn test_selection_during_construction_is_replayed() {
    let early = Rc::new(RefCell::new(Vec::new()));
    let reported = Rc::clone(&early);
    let (mut bridge, mut events) =
        WorkbookBridge::mount(go_sheet(), &BridgeOptions::default(), 80, move |_| {
            // The widget selects A1 from inside its constructor.
            reported.borrow_mut().push(Coord::new(0, 0));
            Ok(RecordingWidget::default())
        })
        .unwrap();
    events.extend(bridge.replay_selections(early.take()));
    assert_eq!(events, vec![BridgeEvent::SelectCell(SelectedCell::initial())]);

    // The guard is spent, so keyboard navigation is announced.
    assert_eq!(
        bridge.widget_selection(Coord::new(3, 3)),
        vec![BridgeEvent::SelectCell(SelectedCell {
            label: "D4".to_string(),
            text: String::new(),
        })]
    );
}

#[test]
fn test_replay_announces_later_early_selections() {
    let (mut bridge, _, _) = mount(go_sheet());
    let events = bridge.replay_selections([Coord::new(0, 0), Coord::new(2, 0)]);
    assert_eq!(
        events,
        vec![BridgeEvent::SelectCell(SelectedCell {
            label: "A1".to_string(),
            text: "Go".to_string(),
        })]
    );
    assert!(bridge.replay_selections([]).is_empty());
}

#[test]
fn test_press_on_merge_child_fires_anchor_once() {
    let (mut bridge, log, _) = mount(go_sheet());
    bridge.pointer_down(Coord::new(2, 0), PointerInput::left());
    assert!(log.borrow().contains(&"invoke ClearCopySelection".to_string()));

    let events = bridge.widget_selection(Coord::new(0, 0));
    assert_eq!(fired(&events), 1);
    match &events[1] {
        BridgeEvent::FireAction { anchor, kind, cell } => {
            assert_eq!(*anchor, Coord::new(0, 0));
            assert_eq!(*kind, InteractionKind::Single);
            assert_eq!(cell.action_type, "nav");
        }
        other => panic!("expected a fired action, got {other:?}"),
    }

    // A repeated selection without a new press is focus restoration.
    assert_eq!(fired(&bridge.widget_selection(Coord::new(1, 0))), 0);
}

#[test]
fn test_selection_elsewhere_does_not_fire() {
    let (mut bridge, _, _) = mount(go_sheet());
    bridge.pointer_down(Coord::new(0, 0), PointerInput::left());
    let events = bridge.widget_selection(Coord::new(4, 2));
    assert_eq!(fired(&events), 0);
    assert_eq!(events.len(), 1);
}

#[test]
fn test_synthetic_and_secondary_presses_do_not_arm() {
    let (mut bridge, log, _) = mount(go_sheet());
    let at = Coord::new(0, 0);
    bridge.pointer_down(
        at,
        PointerInput {
            button: LEFT_BUTTON,
            trusted: false,
        },
    );
    bridge.pointer_down(
        at,
        PointerInput {
            button: 2,
            trusted: true,
        },
    );
    assert_eq!(log.borrow().len(), 1);
    // Still the mount-time suppression: nothing was pressed.
    assert!(bridge.widget_selection(at).is_empty());
}

#[test]
fn test_disabled_and_non_single_cells_only_select() {
    let (mut bridge, _, _) = mount(trigger_row());
    for col in 1..=5 {
        let events = click(&mut bridge, col, 0);
        assert_eq!(fired(&events), 0, "col {col}");
        assert_eq!(events.len(), 1, "col {col}");
    }
    assert_eq!(fired(&click(&mut bridge, 0, 0)), 1);
}

// ============================================================================
// Double click and Enter
// ============================================================================

#[test]
fn test_double_click_fires_double_triggers() {
    let (mut bridge, _, _) = mount(trigger_row());
    assert_eq!(fired(&bridge.double_click(Coord::new(0, 0), true)), 0);
    assert_eq!(fired(&bridge.double_click(Coord::new(1, 0), true)), 1);
    assert_eq!(fired(&bridge.double_click(Coord::new(3, 0), true)), 1);
    assert_eq!(fired(&bridge.double_click(Coord::new(7, 0), true)), 0);
    assert_eq!(fired(&bridge.double_click(Coord::new(1, 0), false)), 0);
    assert_eq!(fired(&bridge.double_click(Coord::new(20, 0), true)), 0);
}

#[test]
fn test_enter_requires_user_selection() {
    let (mut bridge, _, _) = mount(trigger_row());
    bridge.widget_selection(Coord::new(2, 0));
    bridge.widget_selection(Coord::new(2, 0));
    let outcome = bridge.key_down("Enter");
    assert!(outcome.events.is_empty());
    assert!(!outcome.prevent_default);
}

#[test]
fn test_enter_fires_selected_anchor() {
    let (mut bridge, _, _) = mount(trigger_row());
    click(&mut bridge, 2, 0);
    let outcome = bridge.key_down("Enter");
    assert!(outcome.prevent_default);
    assert!(matches!(
        outcome.events[..],
        [BridgeEvent::FireAction {
            kind: InteractionKind::Enter,
            ..
        }]
    ));

    click(&mut bridge, 3, 0);
    assert_eq!(fired(&bridge.key_down("Enter").events), 1);
    assert!(bridge.key_down("Escape").events.is_empty());

    click(&mut bridge, 0, 0);
    assert!(!bridge.key_down("Enter").prevent_default);
}

// ============================================================================
// Capabilities and teardown
// ============================================================================

#[test]
fn test_missing_capabilities_are_skipped() {
    let (mut bridge, log, _) = mount_with(go_sheet(), |log| {
        RecordingWidget::with_capabilities(log, &[])
    });
    assert_eq!(fired(&click(&mut bridge, 0, 0)), 1);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_capability_failures_are_swallowed() {
    let (mut bridge, log, _) = mount_with(go_sheet(), |log| RecordingWidget {
        fail_invoke: true,
        ..RecordingWidget::with_capabilities(
            log,
            &[Capability::HideIndexColumn, Capability::ClearCopySelection],
        )
    });
    assert_eq!(fired(&click(&mut bridge, 0, 0)), 1);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn test_unmount_survives_destroy_failure() {
    let (bridge, log, _) = mount_with(go_sheet(), |log| RecordingWidget {
        fail_destroy: true,
        ..RecordingWidget::with_capabilities(log, &[])
    });
    let model = bridge.unmount();
    assert_eq!(*log.borrow(), vec!["destroy".to_string()]);
    assert_eq!(model.col_count(), 5);
}

#[test]
fn test_remount_starts_fresh() {
    let (mut bridge, _, _) = mount(go_sheet());
    click(&mut bridge, 0, 0);
    let model = bridge.unmount();
    let (mut bridge, _, _) = mount(model);
    assert!(!bridge.interaction().user_selection_active());
    assert!(bridge.widget_selection(Coord::new(0, 0)).is_empty());
}

// ============================================================================
// Host dispatch
// ============================================================================

#[test]
fn test_events_reach_host_in_order() {
    let (mut bridge, _, mut events) = mount(go_sheet());
    events.extend(click(&mut bridge, 1, 0));
    let mut host = RecordingHost::default();
    dispatch_events(events, &mut host);
    assert_eq!(
        host.calls,
        vec![
            "select  =".to_string(),
            "select A1 Go".to_string(),
            "action nav null Go".to_string(),
        ]
    );
}

#[test]
fn test_known_action_reaches_semantic_callback() {
    let (mut bridge, _, _) = mount(trigger_row());
    let events = bridge.double_click(Coord::new(3, 0), true);
    let mut host = RecordingHost::default();
    dispatch_events(events, &mut host);
    assert_eq!(host.calls, vec!["open_post p1 free".to_string()]);
}
