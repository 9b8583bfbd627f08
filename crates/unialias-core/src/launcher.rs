//! Window launcher: the registry of live windows, keyed by label.
//!
//! Satellite windows are created lazily from a fixed configuration table the
//! first time they are requested. Opening a label that is already live brings
//! the existing window forward instead of creating a second one.

use crate::window::{WindowBackend, WindowHandle, bring_forward};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use unialias_types::{WindowConfig, WindowLabel};

type Registry = HashMap<WindowLabel, Arc<dyn WindowHandle>>;

/// Configuration for every window that can be opened by label
#[must_use]
pub fn default_window_configs() -> Vec<WindowConfig> {
    vec![
        WindowConfig::new(
            WindowLabel::Help,
            "UniAlias Help",
            "/help/index.html",
            500,
            500,
        ),
        WindowConfig::new(
            WindowLabel::Settings,
            "UniAlias Settings",
            "/settings/index.html",
            500,
            500,
        ),
        WindowConfig::new(
            WindowLabel::DatasetMng,
            "Dataset Management",
            "/dataset_mng/index.html",
            800,
            600,
        ),
    ]
}

/// What [`WindowLauncher::open`] did
pub enum LaunchOutcome {
    /// The window already existed and was brought forward
    Focused(Arc<dyn WindowHandle>),
    /// A new window is being created
    Created {
        handle: Arc<dyn WindowHandle>,
        ready: CreationWatch,
    },
}

impl LaunchOutcome {
    #[must_use]
    pub fn handle(&self) -> &Arc<dyn WindowHandle> {
        match self {
            LaunchOutcome::Focused(handle) | LaunchOutcome::Created { handle, .. } => handle,
        }
    }
}

/// Background observer of a window's creation outcome.
///
/// The observer logs and cleans up on its own; awaiting it is optional.
pub struct CreationWatch {
    label: WindowLabel,
    task: JoinHandle<Result<()>>,
}

impl CreationWatch {
    /// Wait until the host reports whether the window came up.
    ///
    /// # Errors
    ///
    /// Returns `Error::WindowCreationFailed` if creation failed.
    pub async fn finished(self) -> Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(Error::WindowCreationFailed {
                label: self.label,
                cause: e.to_string(),
            }),
        }
    }
}

pub struct WindowLauncher {
    backend: Arc<dyn WindowBackend>,
    configs: HashMap<WindowLabel, WindowConfig>,
    windows: Arc<Mutex<Registry>>,
}

impl WindowLauncher {
    #[must_use]
    pub fn new(backend: Arc<dyn WindowBackend>) -> Self {
        Self::with_configs(backend, default_window_configs())
    }

    pub fn with_configs(
        backend: Arc<dyn WindowBackend>,
        configs: impl IntoIterator<Item = WindowConfig>,
    ) -> Self {
        Self {
            backend,
            configs: configs.into_iter().map(|c| (c.label, c)).collect(),
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        lock(&self.windows)
    }

    #[must_use]
    pub fn config(&self, label: WindowLabel) -> Option<&WindowConfig> {
        self.configs.get(&label)
    }

    /// Register a window the host created itself (the main window)
    pub fn adopt(&self, handle: Arc<dyn WindowHandle>) {
        debug!("Adopting {} window", handle.label());
        self.registry().insert(handle.label(), handle);
    }

    #[must_use]
    pub fn get(&self, label: WindowLabel) -> Option<Arc<dyn WindowHandle>> {
        self.registry().get(&label).cloned()
    }

    #[must_use]
    pub fn is_open(&self, label: WindowLabel) -> bool {
        self.registry().contains_key(&label)
    }

    #[must_use]
    pub fn open_labels(&self) -> Vec<WindowLabel> {
        let mut labels: Vec<_> = self.registry().keys().copied().collect();
        labels.sort();
        labels
    }

    /// Forget a window that was closed; the next `open` recreates it.
    pub fn close(&self, label: WindowLabel) -> Option<Arc<dyn WindowHandle>> {
        let removed = self.registry().remove(&label);
        if removed.is_some() {
            info!("{label} window closed");
        }
        removed
    }

    /// Open the window called `name`, themed with `theme`.
    ///
    /// Must be called from within a tokio runtime: creation is observed by a
    /// spawned task.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownWindowLabel` if `name` has no configuration,
    /// `Error::WindowCreationFailed` if the backend refuses to create it, or
    /// the failing window primitive if an existing window cannot be focused.
    pub fn open(&self, name: &str, theme: &str) -> Result<LaunchOutcome> {
        let label: WindowLabel = name
            .parse()
            .map_err(|_| Error::UnknownWindowLabel(name.to_string()))?;
        let config = self
            .configs
            .get(&label)
            .ok_or_else(|| Error::UnknownWindowLabel(name.to_string()))?
            .clone()
            .with_theme(theme);

        let mut windows = self.registry();
        if let Some(existing) = windows.get(&label).cloned() {
            drop(windows);
            debug!("{label} window already open, bringing it forward");
            bring_forward(existing.as_ref())?;
            return Ok(LaunchOutcome::Focused(existing));
        }

        let creation = self.backend.create(&config).map_err(|e| {
            error!("Failed to create window for {label}: {e}");
            Error::WindowCreationFailed {
                label,
                cause: e.to_string(),
            }
        })?;
        windows.insert(label, creation.handle.clone());
        drop(windows);

        let registry = Arc::clone(&self.windows);
        let handle = creation.handle.clone();
        let outcome = creation.outcome;
        let task = tokio::spawn(async move {
            let cause = match outcome.await {
                Ok(Ok(())) => {
                    debug!("{label} window successfully created");
                    return Ok(());
                }
                Ok(Err(cause)) => cause,
                Err(_) => "creation outcome was never reported".to_string(),
            };
            error!("Failed to create window for {label}: {cause}");
            let mut windows = lock(&registry);
            if windows
                .get(&label)
                .is_some_and(|current| Arc::ptr_eq(current, &handle))
            {
                windows.remove(&label);
            }
            Err(Error::WindowCreationFailed { label, cause })
        });

        Ok(LaunchOutcome::Created {
            handle: creation.handle,
            ready: CreationWatch { label, task },
        })
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
