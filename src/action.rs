//! Mapping from a fired cell to the host's semantic callbacks.
//!
//! Known action types carry a fixed payload shape. A known type with a
//! missing or mistyped payload is swallowed; an unknown type goes to the
//! generic [`ActionHandler::on_action`] fallback.

use serde_json::{Map, Value};

use crate::types::Cell;

pub const OPEN_GUIDE: &str = "open-guide";
pub const TOGGLE_THEME: &str = "toggle-theme";
pub const LOGOUT: &str = "logout";
pub const MY_POSTS: &str = "my-posts";
pub const MY_COMMENTS: &str = "my-comments";
pub const ADMIN: &str = "admin";
pub const NOTIFICATIONS: &str = "notifications";
pub const MOBILE_PUSH: &str = "mobile-push";
pub const COMPOSE: &str = "compose";
pub const SELECT_BOARD: &str = "select-board";
pub const SORT: &str = "sort";
pub const PAGE: &str = "page";
pub const OPEN_POST: &str = "open-post";

/// Host callbacks for fired cells.
///
/// Only the fallback is required; every semantic callback defaults to a no-op
/// so hosts implement what they expose.
pub trait ActionHandler {
    fn open_guide(&mut self) {}
    fn toggle_theme(&mut self) {}
    fn logout(&mut self) {}
    fn open_my_posts(&mut self) {}
    fn open_my_comments(&mut self) {}
    fn open_admin(&mut self) {}
    fn open_notifications(&mut self) {}
    fn open_mobile_push(&mut self) {}
    fn open_composer(&mut self) {}
    fn select_board(&mut self, _board_id: &str) {}
    fn sort(&mut self, _mode: &str) {}
    fn page(&mut self, _page: u32) {}
    fn open_post(&mut self, _post_id: &str, _board_id: &str) {}

    /// Any action type outside the enumerated set.
    fn on_action(&mut self, action_type: &str, payload: Option<&Map<String, Value>>, cell: &Cell);
}

/// A recognized action with its validated payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    OpenGuide,
    ToggleTheme,
    Logout,
    MyPosts,
    MyComments,
    Admin,
    Notifications,
    MobilePush,
    Compose,
    SelectBoard { board_id: &'a str },
    Sort { mode: &'a str },
    Page { page: u32 },
    OpenPost { post_id: &'a str, board_id: &'a str },
}

/// Outcome of looking a cell's action up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Known(Action<'a>),
    /// Known type, unusable payload
    Swallowed,
    /// Not in the enumerated set
    Unknown,
    /// No action configured
    Inert,
}

impl<'a> Action<'a> {
    pub fn resolve(cell: &'a Cell) -> Resolution<'a> {
        let payload = cell.action_payload.as_ref();
        let known = |action: Option<Action<'a>>| match action {
            Some(action) => Resolution::Known(action),
            None => Resolution::Swallowed,
        };
        match cell.action_type.as_str() {
            "" => Resolution::Inert,
            OPEN_GUIDE => Resolution::Known(Action::OpenGuide),
            TOGGLE_THEME => Resolution::Known(Action::ToggleTheme),
            LOGOUT => Resolution::Known(Action::Logout),
            MY_POSTS => Resolution::Known(Action::MyPosts),
            MY_COMMENTS => Resolution::Known(Action::MyComments),
            ADMIN => Resolution::Known(Action::Admin),
            NOTIFICATIONS => Resolution::Known(Action::Notifications),
            MOBILE_PUSH => Resolution::Known(Action::MobilePush),
            COMPOSE => Resolution::Known(Action::Compose),
            SELECT_BOARD => known(
                payload_str(payload, "boardId").map(|board_id| Action::SelectBoard { board_id }),
            ),
            SORT => known(payload_str(payload, "mode").map(|mode| Action::Sort { mode })),
            PAGE => known(payload_page(payload).map(|page| Action::Page { page })),
            OPEN_POST => known(
                payload_str(payload, "postId")
                    .zip(payload_str(payload, "boardId"))
                    .map(|(post_id, board_id)| Action::OpenPost { post_id, board_id }),
            ),
            _ => Resolution::Unknown,
        }
    }

    pub fn action_type(&self) -> &'static str {
        match self {
            Action::OpenGuide => OPEN_GUIDE,
            Action::ToggleTheme => TOGGLE_THEME,
            Action::Logout => LOGOUT,
            Action::MyPosts => MY_POSTS,
            Action::MyComments => MY_COMMENTS,
            Action::Admin => ADMIN,
            Action::Notifications => NOTIFICATIONS,
            Action::MobilePush => MOBILE_PUSH,
            Action::Compose => COMPOSE,
            Action::SelectBoard { .. } => SELECT_BOARD,
            Action::Sort { .. } => SORT,
            Action::Page { .. } => PAGE,
            Action::OpenPost { .. } => OPEN_POST,
        }
    }

    fn invoke<H: ActionHandler + ?Sized>(self, handler: &mut H) {
        match self {
            Action::OpenGuide => handler.open_guide(),
            Action::ToggleTheme => handler.toggle_theme(),
            Action::Logout => handler.logout(),
            Action::MyPosts => handler.open_my_posts(),
            Action::MyComments => handler.open_my_comments(),
            Action::Admin => handler.open_admin(),
            Action::Notifications => handler.open_notifications(),
            Action::MobilePush => handler.open_mobile_push(),
            Action::Compose => handler.open_composer(),
            Action::SelectBoard { board_id } => handler.select_board(board_id),
            Action::Sort { mode } => handler.sort(mode),
            Action::Page { page } => handler.page(page),
            Action::OpenPost { post_id, board_id } => handler.open_post(post_id, board_id),
        }
    }
}

/// Which path a dispatch took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Handled,
    Swallowed,
    Fallback,
    Inert,
}

/// Route `cell`'s action to `handler`.
pub fn dispatch<H: ActionHandler + ?Sized>(cell: &Cell, handler: &mut H) -> Dispatched {
    match Action::resolve(cell) {
        Resolution::Known(action) => {
            log::debug!("dispatching {}", action.action_type());
            action.invoke(handler);
            Dispatched::Handled
        }
        Resolution::Swallowed => {
            log::debug!("{} fired without a usable payload", cell.action_type);
            Dispatched::Swallowed
        }
        Resolution::Unknown => {
            handler.on_action(&cell.action_type, cell.action_payload.as_ref(), cell);
            Dispatched::Fallback
        }
        Resolution::Inert => Dispatched::Inert,
    }
}

fn payload_str<'a>(payload: Option<&'a Map<String, Value>>, field: &str) -> Option<&'a str> {
    payload?
        .get(field)?
        .as_str()
        .filter(|s| !s.is_empty())
}

fn payload_page(payload: Option<&Map<String, Value>>) -> Option<u32> {
    let page = payload?.get("page")?.as_u64()?;
    u32::try_from(page).ok().filter(|p| *p >= 1)
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
    use serde_json::json;

    fn cell(action_type: &str, payload: Value) -> Cell {
        Cell {
            action_type: action_type.to_string(),
            action_payload: payload.as_object().cloned(),
            ..Cell::blank()
        }
    }

    #[test]
    fn test_resolve_known_without_payload() {
        let c = cell(LOGOUT, Value::Null);
        assert_eq!(Action::resolve(&c), Resolution::Known(Action::Logout));
    }

    #[test]
    fn test_resolve_open_post_needs_both_ids() {
        let c = cell(OPEN_POST, json!({"postId": "p1", "boardId": "free"}));
        assert_eq!(
            Action::resolve(&c),
            Resolution::Known(Action::OpenPost {
                post_id: "p1",
                board_id: "free"
            })
        );
        let c = cell(OPEN_POST, json!({"postId": "p1"}));
        assert_eq!(Action::resolve(&c), Resolution::Swallowed);
    }

    #[test]
    fn test_page_must_be_positive_integer() {
        assert_eq!(
            Action::resolve(&cell(PAGE, json!({"page": 3}))),
            Resolution::Known(Action::Page { page: 3 })
        );
        for bad in [json!({"page": 0}), json!({"page": "3"}), json!({"page": 1.5}), json!({})] {
            assert_eq!(Action::resolve(&cell(PAGE, bad.clone())), Resolution::Swallowed, "{bad}");
        }
    }

    #[test]
    fn test_unknown_and_inert() {
        assert_eq!(Action::resolve(&cell("nav", Value::Null)), Resolution::Unknown);
        assert_eq!(Action::resolve(&cell("", Value::Null)), Resolution::Inert);
    }
}
