//! Window capabilities provided by the host.
//!
//! The core never talks to a window manager directly. A host implements
//! [`WindowBackend`] to create windows and hands back a [`WindowHandle`] per
//! window; everything the controllers do to a window goes through it.

use crate::Result;
use std::sync::Arc;
use tokio::sync::oneshot;
use unialias_types::{WindowConfig, WindowLabel};

/// Capability object for one live window
pub trait WindowHandle: Send + Sync {
    fn label(&self) -> WindowLabel;

    /// # Errors
    ///
    /// Returns `Error::Window` if the host cannot show the window.
    fn show(&self) -> Result<()>;

    /// # Errors
    ///
    /// Returns `Error::Window` if the host cannot hide the window.
    fn hide(&self) -> Result<()>;

    /// # Errors
    ///
    /// Returns `Error::Window` if the host cannot focus the window.
    fn set_focus(&self) -> Result<()>;

    /// # Errors
    ///
    /// Returns `Error::Window` if the host cannot report the window state.
    fn is_minimized(&self) -> Result<bool>;

    /// # Errors
    ///
    /// Returns `Error::Window` if the host cannot restore the window.
    fn unminimize(&self) -> Result<()>;
}

/// Result of asynchronous window creation, reported once by the host
pub type CreationOutcome = std::result::Result<(), String>;

/// A window whose creation has started.
///
/// The handle is usable immediately. `outcome` resolves once the host knows
/// whether the window actually came up.
pub struct WindowCreation {
    pub handle: Arc<dyn WindowHandle>,
    pub outcome: oneshot::Receiver<CreationOutcome>,
}

pub trait WindowBackend: Send + Sync {
    /// Start creating a window from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the request outright. Failures
    /// discovered later are reported through [`WindowCreation::outcome`].
    fn create(&self, config: &WindowConfig) -> Result<WindowCreation>;
}

/// Show a window and give it focus.
///
/// Un-minimizing has to happen before focusing: focusing a minimized window
/// is silently ignored on some platforms.
///
/// # Errors
///
/// Returns the first failing window primitive.
pub fn bring_forward(window: &dyn WindowHandle) -> Result<()> {
    window.show()?;
    if window.is_minimized()? {
        window.unminimize()?;
    }
    window.set_focus()
}
