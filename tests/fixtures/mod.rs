//! Test fixtures: ready-made patch scripts and forum snapshots.
//!
//! # Example
//!
//! ```rust,ignore
//! let model = go_sheet();
//! assert_eq!(model.merge_index().len(), 2);
//! ```
#![allow(dead_code)]

use serde_json::json;

use appexcel::forum::{BoardNavItem, ForumSnapshot, PostRow};
use appexcel::sheet::{build, ActionPatch, CellPatch, SheetBuilder, SheetInput, SheetModel};
use appexcel::trigger::Trigger;

/// 5×5 grid with a "Go" button at A1 spanning three columns.
pub fn go_sheet_input() -> SheetInput {
    let mut input = SheetInput::new(5, 5);
    input.push(ActionPatch::new(0, 0, "Go", "nav").merge(2));
    input
}

pub fn go_sheet() -> SheetModel {
    build(&go_sheet_input())
}

/// One row of every trigger flavour, plus disabled cells and a static cell.
///
/// | col | content |
/// |-----|---------|
/// | 0 | single `nav` |
/// | 1 | double `nav` |
/// | 2 | enter `nav` |
/// | 3 | double-enter `open-post` |
/// | 4 | disabled single `nav` |
/// | 5 | static text |
/// | 6 | blank |
/// | 7 | disabled double-enter `open-post` |
pub fn trigger_row() -> SheetModel {
    let mut b = SheetBuilder::new(3, 8);
    b.action_cell(&ActionPatch::new(0, 0, "single", "nav"))
        .action_cell(&ActionPatch::new(1, 0, "double", "nav").trigger(Trigger::Double))
        .action_cell(&ActionPatch::new(2, 0, "enter", "nav").trigger(Trigger::Enter))
        .action_cell(
            &ActionPatch::new(3, 0, "post", "open-post")
                .trigger(Trigger::DoubleEnter)
                .payload(json!({"postId": "p1", "boardId": "free"})),
        )
        .action_cell(&ActionPatch::new(4, 0, "off", "nav").disabled(true))
        .static_cell(&CellPatch::new(5, 0, "static"))
        .action_cell(
            &ActionPatch::new(7, 0, "locked", "open-post")
                .trigger(Trigger::DoubleEnter)
                .payload(json!({"postId": "p2", "boardId": "free"}))
                .disabled(true),
        );
    b.build()
}

pub fn post(n: u32, board: &str) -> PostRow {
    PostRow {
        post_id: format!("p{n}"),
        board_id: board.to_string(),
        no: n.to_string(),
        title: format!("Post {n}"),
        author: "kim".to_string(),
        date_text: "10-19".to_string(),
        views: (n * 10).to_string(),
        board_label: board.to_uppercase(),
    }
}

pub fn board(id: &str, name: &str) -> BoardNavItem {
    BoardNavItem {
        id: id.to_string(),
        name: name.to_string(),
        is_selected: false,
    }
}

/// A board view of "free" with three posts on page 2 of 4.
pub fn forum_snapshot() -> ForumSnapshot {
    ForumSnapshot {
        boards: vec![board("free", "Free"), board("qna", "Q&A"), board("notice", "Notice")],
        posts: (1..=3).map(|n| post(n, "free")).collect(),
        selected_board_id: "free".to_string(),
        current_board_name: "Free".to_string(),
        user_display_name: "Kim".to_string(),
        user_role_label: "Member".to_string(),
        page: 2,
        total_pages: 4,
        sort_mode: "views".to_string(),
        view_mode: "board".to_string(),
        can_access_admin: false,
        has_unread_notifications: true,
        mobile_push_enabled: false,
        empty_message: String::new(),
        can_compose: true,
        row_count: None,
        col_count: None,
    }
}
