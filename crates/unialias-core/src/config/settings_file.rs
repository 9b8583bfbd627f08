//! `settings.json` on disk.

use crate::services::SettingsStore;
use crate::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use unialias_types::Settings;

const KNOWN_FIELDS: [&str; 2] = ["hotkey", "theme"];

/// Settings persisted as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    async fn load_settings(&self) -> Result<Settings> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", self.path.display());
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(Error::SettingsLoadFailed(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };

        warn_unknown_fields(&content);
        serde_json::from_str(&content)
            .map_err(|e| Error::SettingsLoadFailed(format!("{}: {e}", self.path.display())))
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let save_failed = |e: &dyn std::fmt::Display| {
            Error::SettingsSaveFailed(format!("{}: {e}", self.path.display()))
        };

        let content = serde_json::to_string_pretty(settings).map_err(|e| save_failed(&e))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| save_failed(&e))?;
        }
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| save_failed(&e))?;
        debug!("Settings written to {}", self.path.display());
        Ok(())
    }
}

/// Warn about keys the settings window does not know.
fn warn_unknown_fields(content: &str) {
    for key in unknown_fields(content) {
        warn!("Unknown settings field in settings.json: {key}");
    }
}

fn unknown_fields(content: &str) -> Vec<String> {
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(content) else {
        return Vec::new();
    };
    obj.keys()
        .filter(|key| !KNOWN_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect()
}
