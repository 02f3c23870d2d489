//! Pointer/selection correlation for one mount.
//!
//! The widget reports selections asynchronously and may normalize the
//! coordinate. A single-trigger action only fires when the selection lands on
//! the anchor recorded by the preceding press, so drag-selects and focus
//! restoration never fire click actions.

use crate::types::Coord;

/// Where the interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No pointer activity since mount
    #[default]
    Idle,
    /// A press was recorded and its selection has not arrived yet
    PendingPress { anchor: Coord },
    /// The widget reported a selection
    Selected { anchor: Coord },
}

/// Result of feeding one widget selection into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The widget's automatic selection right after mount
    Suppressed,
    Selected {
        anchor: Coord,
        /// The press immediately before landed on the same anchor
        pressed_here: bool,
    },
}

/// Interaction state owned by a bridge mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionState {
    phase: Phase,
    selection: Option<Coord>,
    user_selection_active: bool,
    suppress_next_selection: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            selection: None,
            user_selection_active: false,
            suppress_next_selection: true,
        }
    }

    /// Back to the freshly-mounted state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Authoritative selected anchor, if any.
    pub fn selection(&self) -> Option<Coord> {
        self.selection
    }

    /// Set by the first user press, cleared on mount.
    pub fn user_selection_active(&self) -> bool {
        self.user_selection_active
    }

    /// Record a trusted left press on `anchor`.
    pub fn press(&mut self, anchor: Coord) {
        self.phase = Phase::PendingPress { anchor };
        self.user_selection_active = true;
        self.suppress_next_selection = false;
    }

    /// Feed a selection reported by the widget, already resolved to its anchor.
    pub fn select(&mut self, anchor: Coord) -> SelectOutcome {
        if self.suppress_next_selection && self.phase == Phase::Idle {
            self.suppress_next_selection = false;
            return SelectOutcome::Suppressed;
        }
        self.suppress_next_selection = false;
        let pressed_here = self.phase == Phase::PendingPress { anchor };
        self.phase = Phase::Selected { anchor };
        self.selection = Some(anchor);
        SelectOutcome::Selected {
            anchor,
            pressed_here,
        }
    }

    /// Anchor an Enter key press applies to.
    pub fn enter_target(&self) -> Option<Coord> {
        if self.user_selection_active {
            self.selection
        } else {
            None
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

    #[test]
    fn test_first_selection_after_mount_is_suppressed() {
        let mut state = InteractionState::new();
        assert_eq!(state.select(Coord::new(0, 0)), SelectOutcome::Suppressed);
        assert_eq!(state.selection(), None);
        assert!(matches!(
            state.select(Coord::new(1, 0)),
            SelectOutcome::Selected {
                pressed_here: false,
                ..
            }
        ));
    }

    #[test]
    fn test_press_before_first_selection_is_not_suppressed() {
        let mut state = InteractionState::new();
        state.press(Coord::new(2, 2));
        assert_eq!(
            state.select(Coord::new(2, 2)),
            SelectOutcome::Selected {
                anchor: Coord::new(2, 2),
                pressed_here: true
            }
        );
    }

    #[test]
    fn test_repeat_selection_does_not_count_as_press() {
        let mut state = InteractionState::new();
        state.press(Coord::new(1, 1));
        state.select(Coord::new(1, 1));
        assert_eq!(
            state.select(Coord::new(1, 1)),
            SelectOutcome::Selected {
                anchor: Coord::new(1, 1),
                pressed_here: false
            }
        );
    }

    #[test]
    fn test_enter_needs_user_activity() {
        let mut state = InteractionState::new();
        state.select(Coord::new(0, 0));
        state.select(Coord::new(3, 0));
        assert_eq!(state.enter_target(), None);
        state.press(Coord::new(3, 0));
        state.select(Coord::new(3, 0));
        assert_eq!(state.enter_target(), Some(Coord::new(3, 0)));
        state.reset();
        assert_eq!(state.enter_target(), None);
        assert_eq!(state.phase(), Phase::Idle);
    }
}
