//! Gate deciding whether a cell's action fires for a given interaction.

use crate::types::Cell;

/// Interaction that declares when a cell fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Single,
    Double,
    Enter,
    DoubleEnter,
}

impl Trigger {
    /// Parse a stored trigger tag; unknown or empty tags never fire.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "single" => Some(Self::Single),
            "double" => Some(Self::Double),
            "enter" => Some(Self::Enter),
            "double-enter" => Some(Self::DoubleEnter),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Enter => "enter",
            Self::DoubleEnter => "double-enter",
        }
    }

    pub fn accepts(self, kind: InteractionKind) -> bool {
        matches!(
            (self, kind),
            (Self::Single, InteractionKind::Single)
                | (Self::Double | Self::DoubleEnter, InteractionKind::Double)
                | (Self::Enter | Self::DoubleEnter, InteractionKind::Enter)
        )
    }
}

/// What the user just did to a resolved cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Press and the resulting selection landed on the same anchor
    Single,
    /// Trusted `dblclick`
    Double,
    /// Enter while a user selection is active
    Enter,
}

/// Whether `cell`'s configured action fires for `kind`.
///
/// Disabled and inert cells never fire.
pub fn can_fire(cell: &Cell, kind: InteractionKind) -> bool {
    if cell.disabled || !cell.has_action() {
        return false;
    }
    Trigger::parse(&cell.trigger).is_some_and(|t| t.accepts(kind))
}
