//! Forum presentation: the snapshot a forum host hands over and the layout
//! script that turns it into builder patches.

mod layout;
mod snapshot;

pub use layout::{
    layout, page_window, TableColumns, DEFAULT_COLUMNS, FIRST_POST_ROW, HEADER_ROW, MIN_COLUMNS,
    PAGE_WINDOW, PANEL_TOP, PANEL_WIDTH, PROFILE_ROW, SORT_MODES, SORT_ROW,
};
pub use snapshot::{BoardNavItem, ForumSnapshot, PostRow};
