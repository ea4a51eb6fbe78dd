//! Keybinding configuration: defaults, optional overrides from a file, and
//! resolution of key presses to actions.
//!
//! The override file holds one `<Action> = <KeySpec>` per line; `#` starts a
//! comment. The legacy order `<KeySpec> = <Action>` is accepted too.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic actions available on the main screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Fetch a fresh token.
    GenerateToken,
    /// Fetch the positions list.
    FetchPositions,
    /// Load the next page of users.
    ShowMore,
    /// Open the "Get user by ID" prompt.
    FetchUserById,
    /// Open the "Add new user" form.
    AddUser,
    /// Hide the error banner.
    DismissError,
    /// Show the full text of the last error in a scrollable popup.
    ShowErrorDetails,
    ScrollPositionsUp,
    ScrollPositionsDown,
    /// Show the keybindings reference.
    OpenHelp,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Bound but does nothing.
    Ignore,
}

#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('t')), KeyAction::GenerateToken);
        bindings.insert((M::NONE, Char('p')), KeyAction::FetchPositions);
        bindings.insert((M::NONE, Char('m')), KeyAction::ShowMore);
        bindings.insert((M::NONE, Char('g')), KeyAction::FetchUserById);
        bindings.insert((M::NONE, Char('n')), KeyAction::AddUser);
        bindings.insert((M::NONE, Char('x')), KeyAction::DismissError);
        bindings.insert((M::NONE, Esc), KeyAction::DismissError);
        bindings.insert((M::NONE, Char('e')), KeyAction::ShowErrorDetails);
        bindings.insert((M::NONE, Char('[')), KeyAction::ScrollPositionsUp);
        bindings.insert((M::NONE, Char(']')), KeyAction::ScrollPositionsDown);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        // Some terminals report '?' with SHIFT
        bindings.insert((M::SHIFT, Char('?')), KeyAction::OpenHelp);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        Self { bindings }
    }

    /// Defaults, overridden by `path` when given and readable.
    pub fn load(path: Option<&Path>) -> Self {
        path.and_then(Self::from_file).unwrap_or_default()
    }

    /// Start from defaults and apply every recognizable line of the file.
    /// `None` if the file cannot be read.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::from_config_str(&contents))
    }

    pub fn from_config_str(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            } else {
                tracing::warn!(line, "ignoring unrecognized keybinding");
            }
        }
        map
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Human-readable key spec like "Ctrl+c", "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let (mods, rest) = match spec.trim().strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, spec.trim()),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "GenerateToken" => Some(KeyAction::GenerateToken),
        "FetchPositions" => Some(KeyAction::FetchPositions),
        "ShowMore" => Some(KeyAction::ShowMore),
        "FetchUserById" => Some(KeyAction::FetchUserById),
        "AddUser" => Some(KeyAction::AddUser),
        "DismissError" => Some(KeyAction::DismissError),
        "ShowErrorDetails" => Some(KeyAction::ShowErrorDetails),
        "ScrollPositionsUp" => Some(KeyAction::ScrollPositionsUp),
        "ScrollPositionsDown" => Some(KeyAction::ScrollPositionsDown),
        "OpenHelp" => Some(KeyAction::OpenHelp),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PageUp" => Some(KeyAction::PageUp),
        "PageDown" => Some(KeyAction::PageDown),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

/// Label used in the help listing.
pub fn describe_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::GenerateToken => "Generate token",
        KeyAction::FetchPositions => "Get positions",
        KeyAction::ShowMore => "Show more users",
        KeyAction::FetchUserById => "Get user by ID",
        KeyAction::AddUser => "Add new user",
        KeyAction::DismissError => "Close error banner",
        KeyAction::ShowErrorDetails => "Error details",
        KeyAction::ScrollPositionsUp => "Scroll positions up",
        KeyAction::ScrollPositionsDown => "Scroll positions down",
        KeyAction::OpenHelp => "Help",
        KeyAction::MoveUp => "Move up",
        KeyAction::MoveDown => "Move down",
        KeyAction::PageUp => "Page up",
        KeyAction::PageDown => "Page down",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_cover_every_screen_action() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&press(KeyCode::Char('t'))), Some(KeyAction::GenerateToken));
        assert_eq!(km.resolve(&press(KeyCode::Char('p'))), Some(KeyAction::FetchPositions));
        assert_eq!(km.resolve(&press(KeyCode::Char('m'))), Some(KeyAction::ShowMore));
        assert_eq!(km.resolve(&press(KeyCode::Char('g'))), Some(KeyAction::FetchUserById));
        assert_eq!(km.resolve(&press(KeyCode::Char('n'))), Some(KeyAction::AddUser));
        assert_eq!(km.resolve(&press(KeyCode::Char('x'))), Some(KeyAction::DismissError));
        assert_eq!(km.resolve(&press(KeyCode::Char('e'))), Some(KeyAction::ShowErrorDetails));
        assert_eq!(km.resolve(&press(KeyCode::Char(']'))), Some(KeyAction::ScrollPositionsDown));
    }

    #[test]
    fn config_overrides_and_skips_garbage() {
        let km = Keymap::from_config_str(
            "# comment\nShowMore = Ctrl+n\nspace = Quit\nF5 = GenerateToken\nnot a binding\n",
        );
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(km.resolve(&ctrl_n), Some(KeyAction::ShowMore));
        // defaults survive
        assert_eq!(km.resolve(&press(KeyCode::Char('m'))), Some(KeyAction::ShowMore));
        assert_eq!(km.resolve(&press(KeyCode::F(5))), None);
    }

    #[test]
    fn legacy_order_is_accepted() {
        let km = Keymap::from_config_str("r = GenerateToken");
        assert_eq!(km.resolve(&press(KeyCode::Char('r'))), Some(KeyAction::GenerateToken));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let km = Keymap::load(Some(Path::new("/nonexistent/usermgmt/keybinds.conf")));
        assert_eq!(km.resolve(&press(KeyCode::Char('q'))), Some(KeyAction::Quit));
    }

    #[test]
    fn format_key_ctrl() {
        assert_eq!(Keymap::format_key(KeyModifiers::CONTROL, KeyCode::Char('c')), "Ctrl+c");
        assert_eq!(Keymap::format_key(KeyModifiers::NONE, KeyCode::PageDown), "PageDown");
    }
}
