//! Forum layout script: places a [`ForumSnapshot`] onto the grid.
//!
//! Fixed regions, top to bottom:
//! - row 0 hero, row 1 toolbar, row 2 spacer
//! - columns 0..3 from row 3: board panel, then the profile section
//! - columns 3.. from row 3: table title, sort bar, header, posts
//! - pager one row below the last post row

use std::ops::RangeInclusive;

use serde_json::json;

use super::snapshot::ForumSnapshot;
use crate::action;
use crate::sheet::patch::{outline, surface};
use crate::sheet::{ActionPatch, CellPatch, SheetInput};
use crate::trigger::Trigger;
use crate::types::Region;

pub const DEFAULT_COLUMNS: u32 = 12;
pub const MIN_COLUMNS: u32 = 10;
/// Width of the board panel; the post table starts right of it
pub const PANEL_WIDTH: u32 = 3;
pub const PANEL_TOP: u32 = 3;
pub const SORT_ROW: u32 = 4;
pub const HEADER_ROW: u32 = 5;
pub const FIRST_POST_ROW: u32 = 6;
pub const PROFILE_ROW: u32 = 9;
pub const PAGE_WINDOW: u32 = 5;

/// Sort modes offered in the sort bar: (mode, label).
pub const SORT_MODES: [(&str, &str); 3] = [
    ("latest", "Latest"),
    ("views", "Most viewed"),
    ("oldest", "Oldest"),
];

/// Column positions of the post table for a given grid width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumns {
    pub no: u32,
    /// Only present in the cross-board view
    pub board: Option<u32>,
    pub title: u32,
    pub title_span: u32,
    pub author: u32,
    pub date: u32,
    pub views: u32,
}

impl TableColumns {
    pub fn new(col_count: u32, with_board: bool) -> Self {
        let col_count = col_count.max(MIN_COLUMNS);
        let no = PANEL_WIDTH;
        let board = with_board.then_some(no + 1);
        let title = no + 1 + u32::from(with_board);
        let author = col_count - 3;
        Self {
            no,
            board,
            title,
            title_span: author.saturating_sub(title + 1),
            author,
            date: col_count - 2,
            views: col_count - 1,
        }
    }
}

/// Page numbers shown in the pager: at most five, around `page`.
pub fn page_window(page: u32, total_pages: u32) -> RangeInclusive<u32> {
    let total = total_pages.max(1);
    let page = page.clamp(1, total);
    let end = page
        .saturating_add(PAGE_WINDOW / 2)
        .max(PAGE_WINDOW)
        .min(total);
    let start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
    start..=end
}

/// Row/column extents the layout needs for `snapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extents {
    col_count: u32,
    row_count: u32,
    table_bottom: u32,
    pager_row: u32,
    profile_row: u32,
}

impl Extents {
    fn of(snapshot: &ForumSnapshot) -> Self {
        let col_count = snapshot
            .col_count
            .unwrap_or(DEFAULT_COLUMNS)
            .max(MIN_COLUMNS);
        let post_rows = count(snapshot.posts.len()).max(1);
        let table_bottom = FIRST_POST_ROW.saturating_add(post_rows - 1);
        let pager_row = table_bottom.saturating_add(2);
        let profile_row =
            PROFILE_ROW.max((PANEL_TOP + 1).saturating_add(count(snapshot.boards.len())));
        let row_count = snapshot
            .row_count
            .unwrap_or(0)
            .max(pager_row.saturating_add(1))
            .max(profile_row.saturating_add(3));
        Self {
            col_count,
            row_count,
            table_bottom,
            pager_row,
            profile_row,
        }
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Build the patch script for one forum snapshot.
pub fn layout(snapshot: &ForumSnapshot) -> SheetInput {
    let ext = Extents::of(snapshot);
    let cols = ext.col_count;
    let table_width = cols - PANEL_WIDTH;
    let mut input = SheetInput::new(ext.row_count, cols);

    input
        .push(surface(Region::row_strip(0, 0, cols), "hero"))
        .push(surface(Region::row_strip(1, 0, cols), "toolbar"))
        .push(surface(
            Region::new(0, PANEL_TOP, PANEL_WIDTH, ext.profile_row + 3 - PANEL_TOP),
            "panel",
        ))
        .push(surface(
            Region::new(PANEL_WIDTH, PANEL_TOP, table_width, ext.table_bottom + 1 - PANEL_TOP),
            "table",
        ))
        .push(surface(Region::row_strip(ext.pager_row, PANEL_WIDTH, table_width), "pager"));

    input
        .push(outline(Region::new(0, 0, cols, 2)))
        .push(outline(Region::new(0, PANEL_TOP, PANEL_WIDTH, ext.profile_row - PANEL_TOP)))
        .push(outline(Region::new(0, ext.profile_row, PANEL_WIDTH, 3)))
        .push(outline(Region::new(
            PANEL_WIDTH,
            PANEL_TOP,
            table_width,
            ext.table_bottom + 1 - PANEL_TOP,
        )))
        .push(outline(Region::row_strip(ext.pager_row, PANEL_WIDTH, table_width)));

    hero(&mut input, snapshot, cols);
    toolbar(&mut input, snapshot, cols);
    board_panel(&mut input, snapshot);
    profile(&mut input, snapshot, ext.profile_row);
    table(&mut input, snapshot, cols);
    pager(&mut input, snapshot, ext.pager_row);
    input
}

fn hero(input: &mut SheetInput, snapshot: &ForumSnapshot, cols: u32) {
    let title = if snapshot.current_board_name.is_empty() {
        "AppExcel".to_string()
    } else {
        format!("AppExcel · {}", snapshot.current_board_name)
    };
    input.push(CellPatch::new(0, 0, title).kind("hero-title").merge(cols - 1));
}

fn toolbar(input: &mut SheetInput, snapshot: &ForumSnapshot, cols: u32) {
    let notifications = if snapshot.has_unread_notifications {
        "Notifications ●"
    } else {
        "Notifications"
    };
    let push = if snapshot.mobile_push_enabled {
        "Push on"
    } else {
        "Push off"
    };
    let mut items = vec![
        ("Guide", action::OPEN_GUIDE, false),
        ("Theme", action::TOGGLE_THEME, false),
        (notifications, action::NOTIFICATIONS, snapshot.has_unread_notifications),
        (push, action::MOBILE_PUSH, snapshot.mobile_push_enabled),
        ("My posts", action::MY_POSTS, false),
        ("My comments", action::MY_COMMENTS, false),
    ];
    if snapshot.can_access_admin {
        items.push(("Admin", action::ADMIN, false));
    }
    for (col, (label, action_type, active)) in (0..).zip(items) {
        input.push(
            ActionPatch::new(col, 1, label, action_type)
                .kind("toolbar-button")
                .active(active),
        );
    }
    input.push(ActionPatch::new(cols - 1, 1, "Logout", action::LOGOUT).kind("toolbar-button"));
}

fn board_panel(input: &mut SheetInput, snapshot: &ForumSnapshot) {
    input.push(
        CellPatch::new(0, PANEL_TOP, "Boards")
            .kind("panel-header")
            .merge(PANEL_WIDTH - 1),
    );
    for (row, board) in (PANEL_TOP + 1..).zip(&snapshot.boards) {
        input.push(
            ActionPatch::new(0, row, board.name.as_str(), action::SELECT_BOARD)
                .kind("nav-item")
                .merge(PANEL_WIDTH - 1)
                .payload(json!({ "boardId": board.id }))
                .active(snapshot.board_is_selected(board))
                .disabled(board.id.is_empty()),
        );
    }
}

fn profile(input: &mut SheetInput, snapshot: &ForumSnapshot, row: u32) {
    input
        .push(
            CellPatch::new(0, row, "Profile")
                .kind("panel-header")
                .merge(PANEL_WIDTH - 1),
        )
        .push(
            CellPatch::new(0, row + 1, snapshot.user_display_name.as_str())
                .kind("profile-name")
                .merge(PANEL_WIDTH - 1),
        )
        .push(
            CellPatch::new(0, row + 2, snapshot.user_role_label.as_str())
                .kind("profile-role")
                .merge(PANEL_WIDTH - 1),
        );
}

fn table(input: &mut SheetInput, snapshot: &ForumSnapshot, cols: u32) {
    let last_span = cols - PANEL_WIDTH - 1;
    let title = if snapshot.is_all_view() {
        "All posts"
    } else if snapshot.current_board_name.is_empty() {
        "Posts"
    } else {
        snapshot.current_board_name.as_str()
    };
    input.push(CellPatch::new(PANEL_WIDTH, PANEL_TOP, title).kind("table-title").merge(last_span));

    for (col, (mode, label)) in (PANEL_WIDTH..).zip(SORT_MODES) {
        input.push(
            ActionPatch::new(col, SORT_ROW, label, action::SORT)
                .payload(json!({ "mode": mode }))
                .active(snapshot.sort_mode == mode),
        );
    }
    if snapshot.can_compose {
        input.push(ActionPatch::new(cols - 1, SORT_ROW, "Write", action::COMPOSE).kind("compose"));
    }

    let tc = TableColumns::new(cols, snapshot.is_all_view());
    input.push(CellPatch::new(tc.no, HEADER_ROW, "No").kind("table-header"));
    if let Some(board) = tc.board {
        input.push(CellPatch::new(board, HEADER_ROW, "Board").kind("table-header"));
    }
    input
        .push(
            CellPatch::new(tc.title, HEADER_ROW, "Title")
                .kind("table-header")
                .merge(tc.title_span),
        )
        .push(CellPatch::new(tc.author, HEADER_ROW, "Author").kind("table-header"))
        .push(CellPatch::new(tc.date, HEADER_ROW, "Date").kind("table-header"))
        .push(CellPatch::new(tc.views, HEADER_ROW, "Views").kind("table-header"));

    if snapshot.posts.is_empty() {
        let message = if snapshot.empty_message.is_empty() {
            "No posts yet."
        } else {
            snapshot.empty_message.as_str()
        };
        input.push(
            CellPatch::new(PANEL_WIDTH, FIRST_POST_ROW, message)
                .kind("empty-state")
                .merge(last_span),
        );
        return;
    }

    for (row, post) in (FIRST_POST_ROW..).zip(&snapshot.posts) {
        input.push(CellPatch::new(tc.no, row, post.no.as_str()).kind("post-no"));
        if let Some(board) = tc.board {
            input.push(CellPatch::new(board, row, post.board_label.as_str()).kind("post-board"));
        }
        input
            .push(
                ActionPatch::new(tc.title, row, post.title.as_str(), action::OPEN_POST)
                    .kind("post-title")
                    .merge(tc.title_span)
                    .payload(json!({ "postId": post.post_id, "boardId": post.board_id }))
                    .trigger(Trigger::DoubleEnter),
            )
            .push(CellPatch::new(tc.author, row, post.author.as_str()).kind("post-meta"))
            .push(CellPatch::new(tc.date, row, post.date_text.as_str()).kind("post-meta"))
            .push(CellPatch::new(tc.views, row, post.views.as_str()).kind("post-meta"));
    }
}

fn pager(input: &mut SheetInput, snapshot: &ForumSnapshot, row: u32) {
    let total = snapshot.total_pages.max(1);
    let page = snapshot.page.clamp(1, total);

    input.push(
        ActionPatch::new(PANEL_WIDTH, row, "‹ Prev", action::PAGE)
            .kind("pager-button")
            .payload(json!({ "page": page.saturating_sub(1).max(1) }))
            .disabled(page <= 1),
    );
    let mut col = PANEL_WIDTH + 1;
    for n in page_window(page, total) {
        input.push(
            ActionPatch::new(col, row, n.to_string(), action::PAGE)
                .kind("pager-page")
                .payload(json!({ "page": n }))
                .active(n == page),
        );
        col += 1;
    }
    input.push(
        ActionPatch::new(col, row, "Next ›", action::PAGE)
            .kind("pager-button")
            .payload(json!({ "page": page.saturating_add(1).min(total) }))
            .disabled(page >= total),
    );
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
    fn test_page_window() {
        assert_eq!(page_window(1, 10), 1..=5);
        assert_eq!(page_window(5, 10), 3..=7);
        assert_eq!(page_window(10, 10), 6..=10);
        assert_eq!(page_window(2, 3), 1..=3);
        assert_eq!(page_window(0, 0), 1..=1);
        assert_eq!(page_window(99, 4), 1..=4);
    }

    #[test]
    fn test_table_columns() {
        let board_view = TableColumns::new(12, false);
        assert_eq!(board_view.title, 4);
        assert_eq!(board_view.title_span, 4);
        assert_eq!(board_view.author, 9);
        assert_eq!(board_view.views, 11);

        let all_view = TableColumns::new(12, true);
        assert_eq!(all_view.board, Some(4));
        assert_eq!(all_view.title, 5);
        assert_eq!(all_view.title_span, 3);
    }

    #[test]
    fn test_extents_grow_to_fit() {
        let snapshot = ForumSnapshot {
            posts: vec![Default::default(); 30],
            col_count: Some(4),
            ..ForumSnapshot::default()
        };
        let ext = Extents::of(&snapshot);
        assert_eq!(ext.col_count, MIN_COLUMNS);
        assert_eq!(ext.table_bottom, FIRST_POST_ROW + 29);
        assert_eq!(ext.pager_row, FIRST_POST_ROW + 31);
        assert_eq!(ext.row_count, FIRST_POST_ROW + 32);
    }

    #[test]
    fn test_profile_moves_below_long_board_list() {
        let snapshot = ForumSnapshot {
            boards: vec![Default::default(); 8],
            ..ForumSnapshot::default()
        };
        assert_eq!(Extents::of(&snapshot).profile_row, PANEL_TOP + 1 + 8);
        assert_eq!(Extents::of(&ForumSnapshot::default()).profile_row, PROFILE_ROW);
    }
}
