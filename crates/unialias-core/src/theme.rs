//! Per-window theme state kept in sync over the event channel.
//!
//! Each window owns one coordinator. The theme is settled at start, from the
//! creation snapshot or the window's own storage, before any broadcast can
//! arrive, so a window never shows an undefined theme. Local changes are persisted, applied and broadcast;
//! received changes are only applied.

use crate::bus::EventChannel;
use crate::services::LocalStore;
use crate::surface::ThemeSurface;
use std::sync::Arc;
use tracing::{debug, warn};
use unialias_types::{AppEvent, DEFAULT_THEME, THEME_STORAGE_KEY, WindowLabel};

pub struct ThemeCoordinator {
    owner: WindowLabel,
    current: String,
    storage: Arc<dyn LocalStore>,
    surface: Arc<dyn ThemeSurface>,
    channel: EventChannel,
}

impl ThemeCoordinator {
    /// Pick the starting theme and apply it right away.
    ///
    /// A theme snapshot handed over at window creation wins over the
    /// window's own storage and is persisted there, without a broadcast.
    /// Otherwise the persisted theme is used, or the default.
    pub fn start(
        owner: WindowLabel,
        storage: Arc<dyn LocalStore>,
        surface: Arc<dyn ThemeSurface>,
        channel: EventChannel,
        snapshot: Option<&str>,
    ) -> Self {
        let current = match snapshot.filter(|theme| !theme.is_empty()) {
            Some(theme) => {
                if let Err(e) = storage.set(THEME_STORAGE_KEY, theme) {
                    warn!("{owner} failed to persist theme {theme}: {e}");
                }
                theme.to_string()
            }
            None => storage
                .get(THEME_STORAGE_KEY)
                .filter(|theme| !theme.is_empty())
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
        };
        debug!("{owner} starting with theme {current}");
        surface.apply_theme(&current);
        Self {
            owner,
            current,
            storage,
            surface,
            channel,
        }
    }

    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Change the theme from this window and tell every other window.
    ///
    /// A storage failure is logged; the change still applies and broadcasts.
    pub fn set_theme(&mut self, theme: &str) {
        if let Err(e) = self.storage.set(THEME_STORAGE_KEY, theme) {
            warn!("{} failed to persist theme {theme}: {e}", self.owner);
        }
        self.apply(theme);
        self.channel.publish(AppEvent::ThemeChanged(theme.to_string()));
    }

    /// A `theme-changed` broadcast arrived. Never re-broadcasts.
    pub fn on_theme_changed(&mut self, theme: &str) {
        self.apply(theme);
    }

    fn apply(&mut self, theme: &str) {
        theme.clone_into(&mut self.current);
        self.surface.apply_theme(theme);
    }
}
