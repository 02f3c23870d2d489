//! Sheet model: builder primitives, the built grid, and its indexes.
//!
//! This module handles:
//! - Ordered region patches (surface, outline, static cell, action cell)
//! - Horizontal merge bookkeeping
//! - Coordinate and merge-anchor lookups on the finished grid

mod builder;
mod index;
mod model;
pub mod patch;

pub use builder::{build, SheetBuilder, MAX_COL_COUNT, MAX_ROW_COUNT, MIN_COL_COUNT, MIN_ROW_COUNT};
pub use index::{CellIndex, MergeIndex};
pub use model::{SheetModel, SheetView};
pub use patch::{ActionPatch, CellPatch, OutlinePatch, Patch, SheetInput, SurfacePatch};
