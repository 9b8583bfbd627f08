//! Per-window controllers.
//!
//! Every window runs one controller as its own tokio task. A controller owns
//! its state outright; the only ways in are its input channel, the event
//! channel subscription and responses from work it spawned itself.

pub mod dataset;
pub mod help;
pub mod main_window;
pub mod settings;

pub use dataset::{DatasetController, DatasetInput};
pub use help::{HelpController, HelpInput};
pub use main_window::{MainController, MainInput, QueryResponse};
pub use settings::{SettingsController, SettingsInput};

use crate::bus::{EventChannel, Subscription};
use crate::services::LocalStore;
use crate::surface::ThemeSurface;
use crate::theme::ThemeCoordinator;
use crate::window::WindowHandle;
use std::sync::Arc;
use tracing::{debug, warn};
use unialias_types::{AppEvent, EventKind, WindowLabel};

/// What every controller needs from its host
#[derive(Clone)]
pub struct WindowContext {
    pub handle: Arc<dyn WindowHandle>,
    pub channel: EventChannel,
    /// The window's private storage
    pub storage: Arc<dyn LocalStore>,
    /// Theme the opener was showing when it created this window
    pub initial_theme: Option<String>,
}

/// The window plumbing shared by all controllers: its handle, its theme and
/// its event subscription.
pub(crate) struct ThemedWindow {
    handle: Arc<dyn WindowHandle>,
    theme: ThemeCoordinator,
    subscription: Subscription,
}

impl ThemedWindow {
    /// Apply the starting theme, then subscribe to `kinds`.
    ///
    /// `theme-changed` is always part of the subscription.
    pub(crate) fn start(
        ctx: WindowContext,
        surface: Arc<dyn ThemeSurface>,
        kinds: &[EventKind],
    ) -> Self {
        let label = ctx.handle.label();
        let theme = ThemeCoordinator::start(
            label,
            ctx.storage,
            surface,
            ctx.channel.clone(),
            ctx.initial_theme.as_deref(),
        );

        let mut kinds = kinds.to_vec();
        if !kinds.contains(&EventKind::ThemeChanged) {
            kinds.push(EventKind::ThemeChanged);
        }
        let subscription = ctx.channel.subscribe(label, &kinds);

        Self {
            handle: ctx.handle,
            theme,
            subscription,
        }
    }

    pub(crate) fn label(&self) -> WindowLabel {
        self.handle.label()
    }

    pub(crate) fn handle(&self) -> &Arc<dyn WindowHandle> {
        &self.handle
    }

    pub(crate) fn theme(&self) -> &str {
        self.theme.current()
    }

    pub(crate) fn set_theme(&mut self, theme: &str) {
        self.theme.set_theme(theme);
    }

    /// Hide, never close: controller state survives until the next show.
    pub(crate) fn hide(&self) {
        if let Err(e) = self.handle.hide() {
            warn!("Failed to hide {} window: {e}", self.label());
        }
    }

    pub(crate) async fn next_event(&mut self) -> Option<AppEvent> {
        self.subscription.recv().await
    }

    /// Apply a `theme-changed` broadcast. Returns the event back if it is
    /// something else for the caller to handle.
    pub(crate) fn absorb(&mut self, event: AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::ThemeChanged(theme) => {
                debug!("{} received theme {theme}", self.label());
                self.theme.on_theme_changed(&theme);
                None
            }
            other => Some(other),
        }
    }
}
