//! Application state types and entry glue.
//!
//! `ScreenState` is the view-model the controller owns and mutates;
//! `AppState` wraps the controller together with purely presentational state
//! (selection, modals, theme, keymap). The event loop is re-exported as `run`.
//!
pub mod config;
pub mod controller;
pub mod form;
pub mod keymap;
pub mod update;

use ratatui::style::Color;

use crate::api::{PositionList, User};
use controller::Controller;
use form::AddUserForm;
use keymap::Keymap;

/// Most recent failure text and whether it is currently shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub visible: bool,
}

impl ErrorBanner {
    /// Replace the text and (re-)open the banner.
    pub fn raise(&mut self, message: String) {
        self.message = message;
        self.visible = true;
    }

    /// Hide the banner. The text stays, so re-opening shows it again.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}

/// Everything the controller knows. Each field is written only by the
/// completion of its own action.
#[derive(Clone, Debug)]
pub struct ScreenState {
    pub token: Option<String>,
    pub positions: Option<PositionList>,
    pub users: Vec<User>,
    pub selected_user: Option<User>,
    /// Last page requested through pagination (1-based).
    pub page: u32,
    pub page_size: u32,
    pub error: ErrorBanner,
    /// Confirmation waiting for the user to acknowledge.
    pub notice: Option<String>,
    /// Requests dispatched whose completion has not been applied yet.
    pub in_flight: usize,
}

impl ScreenState {
    pub fn new(page_size: u32) -> Self {
        Self {
            token: None,
            positions: None,
            users: Vec::new(),
            selected_user: None,
            page: 1,
            page_size: page_size.max(1),
            error: ErrorBanner::default(),
            notice: None,
            in_flight: 0,
        }
    }

    /// Positions to display: only once the server reported success.
    pub fn visible_positions(&self) -> Option<&serde_json::Value> {
        self.positions.as_ref().and_then(PositionList::visible)
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new(config::DEFAULT_PAGE_SIZE)
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Modal,
}

/// Modal dialogs layered over the main screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// "Get user by ID" prompt.
    UserIdInput,
    /// "Add new user" form.
    AddUser,
    /// Keybindings reference.
    Help { scroll: u16 },
    /// Full text of the last error; `scroll` is clamped when drawn.
    ErrorDetails { scroll: u16 },
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
    pub error_bg: Color,
}

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error_fg: Color::White,
            error_bg: Color::Red,
        }
    }

    /// Catppuccin Mocha palette.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error_fg: Color::Rgb(0x11, 0x11, 0x1b),     // crust
            error_bg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
        }
    }
}

/// Top-level TUI state: the controller plus presentation-only fields.
pub struct AppState {
    pub controller: Controller,
    pub selected_index: usize,
    pub rows_per_page: usize,
    /// First visible line of the positions panel; clamped when drawn.
    pub positions_scroll: u16,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    /// Text of the "Get user by ID" prompt; kept between openings.
    pub user_id_input: String,
    /// The "Add new user" form; not reset after submitting.
    pub add_user_form: AddUserForm,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    pub fn new(controller: Controller, theme: Theme, keymap: Keymap) -> Self {
        Self {
            controller,
            selected_index: 0,
            rows_per_page: 10,
            positions_scroll: 0,
            input_mode: InputMode::Normal,
            modal: None,
            user_id_input: String::new(),
            add_user_form: AddUserForm::default(),
            theme,
            keymap,
        }
    }

    pub fn screen(&self) -> &ScreenState {
        self.controller.state()
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Keep the table selection inside the loaded users.
    pub fn clamp_selection(&mut self) {
        let len = self.screen().users.len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_keeps_message() {
        let mut banner = ErrorBanner::default();
        banner.raise("Error fetching token:\nboom".into());
        banner.dismiss();
        assert!(!banner.visible);
        assert_eq!(banner.message, "Error fetching token:\nboom");
    }

    #[test]
    fn raise_overwrites_and_reopens() {
        let mut banner = ErrorBanner::default();
        banner.raise("first".into());
        banner.dismiss();
        banner.raise("second".into());
        assert!(banner.visible);
        assert_eq!(banner.message, "second");
    }

    #[test]
    fn positions_hidden_until_success() {
        let mut state = ScreenState::new(6);
        assert!(state.visible_positions().is_none());
        state.positions = Some(PositionList {
            success: Some(false.into()),
            positions: Some(serde_json::json!([{"id": 1}])),
            ..Default::default()
        });
        assert!(state.visible_positions().is_none());
        if let Some(list) = state.positions.as_mut() {
            list.success = Some(true.into());
        }
        assert_eq!(
            state.visible_positions(),
            Some(&serde_json::json!([{"id": 1}]))
        );
    }

    #[test]
    fn page_size_is_at_least_one() {
        assert_eq!(ScreenState::new(0).page_size, 1);
    }
}
