//! Data types shared by the sheet builder and the workbook bridge.

mod cell;
mod coord;
mod selection;

pub use cell::*;
pub use coord::*;
pub use selection::*;
