use thiserror::Error;
use unialias_types::WindowLabel;

/// Failures surfaced by the window controllers and their collaborators.
///
/// None of these are fatal to the process: each controller logs them and
/// carries on with its previous state.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown window label: {0}")]
    UnknownWindowLabel(String),

    #[error("Failed to create window {label}: {cause}")]
    WindowCreationFailed { label: WindowLabel, cause: String },

    #[error("Window {label} error: {message}")]
    Window { label: WindowLabel, message: String },

    #[error("Matching engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Failed to load settings: {0}")]
    SettingsLoadFailed(String),

    #[error("Failed to save settings: {0}")]
    SettingsSaveFailed(String),

    #[error("Failed to load dataset: {0}")]
    DatasetLoadFailed(String),
}

impl Error {
    pub fn window(label: WindowLabel, message: impl Into<String>) -> Self {
        Self::Window {
            label,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
