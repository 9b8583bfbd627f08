//! Settings window: edits the persisted [`Settings`].
//!
//! The form is loaded from the store when the window is loaded, with the
//! documented defaults standing in for a missing or unreadable file. The
//! theme selector always starts at the theme the window is showing.
//! Saving persists the form, switches the theme only if the user touched the
//! selector, and hides the window. A failed save leaves the window open with
//! the form as the user left it. Hiding never resets the form.

use super::{ThemedWindow, WindowContext};
use crate::services::SettingsStore;
use crate::surface::SettingsSurface;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use unialias_types::{AppEvent, Key, Settings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsInput {
    Load,
    EditHotkey(String),
    EditTheme(String),
    Save,
    Cancel,
    Key(Key),
}

pub struct SettingsController<S: SettingsStore> {
    window: ThemedWindow,
    surface: Arc<dyn SettingsSurface>,
    store: Arc<S>,
    form: Settings,
    /// Form as last loaded or saved, restored by cancel
    committed: Settings,
    theme_edited: bool,
}

impl<S: SettingsStore> SettingsController<S> {
    pub fn start(ctx: WindowContext, surface: Arc<dyn SettingsSurface>, store: Arc<S>) -> Self {
        let window = ThemedWindow::start(ctx, surface.clone(), &[]);
        Self {
            window,
            surface,
            store,
            form: Settings::default(),
            committed: Settings::default(),
            theme_edited: false,
        }
    }

    #[must_use]
    pub fn form(&self) -> &Settings {
        &self.form
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        self.window.theme()
    }

    /// Fill the form from the store, falling back to defaults on any failure.
    pub async fn load(&mut self) {
        let mut form = match self.store.load_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{e}, using defaults");
                Settings::default()
            }
        };
        self.window.theme().clone_into(&mut form.theme);
        debug!("Settings form loaded: {form:?}");
        self.committed = form.clone();
        self.form = form;
        self.theme_edited = false;
        self.surface.show_form(&self.form);
    }

    pub fn edit_hotkey(&mut self, hotkey: &str) {
        hotkey.clone_into(&mut self.form.hotkey);
    }

    pub fn edit_theme(&mut self, theme: &str) {
        theme.clone_into(&mut self.form.theme);
        self.theme_edited = true;
    }

    /// Persist the form. Returns whether it was saved.
    pub async fn save(&mut self) -> bool {
        // An untouched selector follows whatever theme is live now
        if !self.theme_edited {
            self.window.theme().clone_into(&mut self.form.theme);
        }
        if let Err(e) = self.store.save_settings(&self.form).await {
            error!("{e}");
            return false;
        }
        info!("Settings saved");

        if self.theme_edited && self.form.theme != self.window.theme() {
            let theme = self.form.theme.clone();
            self.window.set_theme(&theme);
        }
        self.committed = self.form.clone();
        self.theme_edited = false;
        self.window.hide();
        true
    }

    /// Drop unsaved edits and hide.
    pub fn cancel(&mut self) {
        self.form = self.committed.clone();
        self.theme_edited = false;
        self.surface.show_form(&self.form);
        self.window.hide();
    }

    /// Returns whether the key was consumed.
    pub fn on_key(&mut self, key: Key) -> bool {
        if key == Key::Escape {
            self.window.hide();
            true
        } else {
            false
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        let _ = self.window.absorb(event);
    }

    pub async fn handle_input(&mut self, input: SettingsInput) {
        match input {
            SettingsInput::Load => self.load().await,
            SettingsInput::EditHotkey(hotkey) => self.edit_hotkey(&hotkey),
            SettingsInput::EditTheme(theme) => self.edit_theme(&theme),
            SettingsInput::Save => {
                self.save().await;
            }
            SettingsInput::Cancel => self.cancel(),
            SettingsInput::Key(key) => {
                self.on_key(key);
            }
        }
    }

    /// Load the form, then serve inputs and broadcasts until either side closes.
    pub async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<SettingsInput>) {
        info!("Settings window controller started");
        self.load().await;
        loop {
            tokio::select! {
                input = inputs.recv() => {
                    let Some(input) = input else {
                        break;
                    };
                    self.handle_input(input).await;
                }

                event = self.window.next_event() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_event(event);
                }
            }
        }
        info!("Settings window controller stopped");
    }
}
