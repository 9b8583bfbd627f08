//! Shared types for UniAlias components.
//!
//! These types cross the boundary between the window controllers in
//! `unialias-core`, the collaborators plugged in behind its traits, and hosts
//! such as `unialias-shell`. Everything that travels over the event channel
//! or into a settings file is serializable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Theme applied when a window has nothing persisted yet
pub const DEFAULT_THEME: &str = "light";

/// Hotkey used when settings are missing or unreadable
pub const DEFAULT_HOTKEY: &str = "alt+shift+u";

/// Number of candidates requested from the matching engine per query
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

/// Local storage key holding a window's theme name
pub const THEME_STORAGE_KEY: &str = "color-theme";

/// One ranked alias suggestion returned by the matching engine.
///
/// `match_length` is the byte length of the prefix of `text` that matched the
/// query and is highlighted when rendered. `value` is an opaque display payload
/// (usually the character the alias resolves to) and plays no part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub text: String,
    pub match_length: usize,
    pub value: String,
}

impl Candidate {
    pub fn new(text: impl Into<String>, match_length: usize, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            match_length,
            value: value.into(),
        }
    }

    /// Split `text` into the matched prefix and the remainder.
    ///
    /// The split point is clamped to the text and moved back onto a char
    /// boundary.
    #[must_use]
    pub fn split_match(&self) -> (&str, &str) {
        let mut end = self.match_length.min(self.text.len());
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        self.text.split_at(end)
    }
}

/// Logical window identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLabel {
    /// The hotkey-activated input window
    Main,
    Help,
    Settings,
    /// Dataset management (one tab per dataset)
    DatasetMng,
}

impl WindowLabel {
    pub const ALL: [WindowLabel; 4] = [
        WindowLabel::Main,
        WindowLabel::Help,
        WindowLabel::Settings,
        WindowLabel::DatasetMng,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            WindowLabel::Main => "main",
            WindowLabel::Help => "help",
            WindowLabel::Settings => "settings",
            WindowLabel::DatasetMng => "dataset_mng",
        }
    }

    /// Satellite windows are the auxiliary ones opened from the main window
    #[must_use]
    pub const fn is_satellite(self) -> bool {
        !matches!(self, WindowLabel::Main)
    }
}

impl fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown window label: {}", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

impl FromStr for WindowLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Fixed configuration a window is created from.
///
/// `theme` is empty in the static table and filled with the theme snapshot
/// of the requesting window at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub label: WindowLabel,
    pub title: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl WindowConfig {
    pub fn new(
        label: WindowLabel,
        title: impl Into<String>,
        url: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            label,
            title: title.into(),
            url: url.into(),
            width,
            height,
            theme: None,
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

/// User settings as persisted by the settings window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_hotkey() -> String {
    DEFAULT_HOTKEY.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            theme: default_theme(),
        }
    }
}

/// Events carried by the cross-window channel.
///
/// The set is closed: windows can only publish and subscribe to these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum AppEvent {
    /// Global hotkey pressed, main window should come forward
    #[serde(rename = "show_window")]
    ShowWindow,

    /// A window changed the theme; payload is the theme name
    #[serde(rename = "theme-changed")]
    ThemeChanged(String),
}

impl AppEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::ShowWindow => EventKind::ShowWindow,
            AppEvent::ThemeChanged(_) => EventKind::ThemeChanged,
        }
    }
}

/// Payload-free discriminant of [`AppEvent`], used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ShowWindow,
    ThemeChanged,
}

impl EventKind {
    /// Channel-level event name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::ShowWindow => "show_window",
            EventKind::ThemeChanged => "theme-changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keys with meaning to the window controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    ArrowDown,
    ArrowUp,
    Other,
}

impl Key {
    /// Map a DOM-style key name (`"ArrowDown"`) or a short alias (`"down"`).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "escape" | "esc" => Key::Escape,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "arrowdown" | "down" => Key::ArrowDown,
            "arrowup" | "up" => Key::ArrowUp,
            _ => Key::Other,
        }
    }
}
