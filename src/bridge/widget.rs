//! Widget seam for the workbook bridge.
//!
//! This module defines the `GridWidget` trait that abstracts the externally
//! owned grid widget, so the bridge can drive the DOM widget in the browser
//! and a recording stand-in under test.

use crate::error::Result;
use crate::normalize::{class_name, display_text, presentation_style, CellStyle};
use crate::types::{Cell, Coord};

/// Everything written onto one rendered cell element.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPresentation {
    pub class_name: String,
    pub style: CellStyle,
    pub text: String,
}

impl CellPresentation {
    pub fn of(cell: &Cell) -> Self {
        Self {
            class_name: class_name(cell),
            style: presentation_style(cell),
            text: display_text(cell).to_string(),
        }
    }
}

/// Optional widget APIs. Probed before every call; absence is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Hide the row-number column
    HideIndexColumn,
    /// Drop the widget's own copy-selection highlight
    ClearCopySelection,
}

/// Trait for grid widget instances owned by a bridge mount.
pub trait GridWidget {
    /// Called once before a presentation pass paints cells.
    fn begin_presentation(&mut self) {}

    /// Write class, style and text onto the element rendered for `at`.
    ///
    /// Elements the widget has not rendered (yet) are skipped silently.
    fn paint_cell(&mut self, at: Coord, presentation: &CellPresentation);

    /// Whether the optional API behind `capability` exists on this instance.
    fn has_capability(&self, _capability: Capability) -> bool {
        false
    }

    /// Call an optional API. Only invoked after `has_capability` said yes.
    fn invoke(&mut self, _capability: Capability) -> Result<()> {
        Ok(())
    }

    /// Tear the widget down. Called at most once per mount.
    fn destroy(&mut self) -> Result<()>;
}

/// Probe-then-call; returns whether the call happened and succeeded.
pub(crate) fn try_capability<W: GridWidget + ?Sized>(widget: &mut W, capability: Capability) -> bool {
    if !widget.has_capability(capability) {
        log::debug!("widget lacks {capability:?}, skipping");
        return false;
    }
    match widget.invoke(capability) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("widget {capability:?} failed: {e}");
            false
        }
    }
}
