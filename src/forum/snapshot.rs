use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of the board navigation panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardNavItem {
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    pub is_selected: bool,
}

/// One post in the current listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostRow {
    pub post_id: String,
    pub board_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date_text: String,
    #[serde(deserialize_with = "lenient_string")]
    pub views: String,
    #[serde(deserialize_with = "lenient_string")]
    pub board_label: String,
}

/// Already-normalized forum state the layout is drawn from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForumSnapshot {
    pub boards: Vec<BoardNavItem>,
    pub posts: Vec<PostRow>,
    pub selected_board_id: String,
    pub current_board_name: String,
    pub user_display_name: String,
    pub user_role_label: String,
    pub page: u32,
    pub total_pages: u32,
    pub sort_mode: String,
    /// `"board"` for one board, `"all"` for the cross-board listing
    pub view_mode: String,
    pub can_access_admin: bool,
    pub has_unread_notifications: bool,
    pub mobile_push_enabled: bool,
    pub empty_message: String,
    pub can_compose: bool,
    /// Minimum grid height; the layout grows past it to fit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u32>,
    /// Minimum grid width; the layout grows past it to fit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_count: Option<u32>,
}

impl ForumSnapshot {
    pub fn is_all_view(&self) -> bool {
        self.view_mode == "all"
    }

    /// Whether `board` is the one currently listed.
    pub fn board_is_selected(&self, board: &BoardNavItem) -> bool {
        board.is_selected || (!board.id.is_empty() && board.id == self.selected_board_id)
    }
}

/// Hosts send counters and numbers as either strings or numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
