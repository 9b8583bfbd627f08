//! Collaborators the controllers call into.
//!
//! Matching, dataset parsing and settings persistence live outside the core.
//! Async methods return `Send` futures so controllers can run them on spawned
//! tasks while their window keeps taking input.

use crate::Result;
use std::future::Future;
use unialias_types::{Candidate, Settings};

/// Alias matching engine
pub trait MatchEngine: Send + Sync + 'static {
    /// Ranked candidates for `text`, at most `max_count` of them.
    ///
    /// Fails with `Error::EngineUnavailable` when no dataset is usable.
    fn query_matches(
        &self,
        text: &str,
        max_count: usize,
    ) -> impl Future<Output = Result<Vec<Candidate>>> + Send;

    /// Commit the user's choice (e.g. type the resolved character).
    fn select_alias(&self, alias: &str) -> impl Future<Output = Result<()>> + Send;

    /// (Re)load the active dataset. Fails with `Error::DatasetLoadFailed`.
    fn reload_dataset(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Source of dataset identifiers and their help pages
pub trait DatasetCatalog: Send + Sync + 'static {
    fn list_dataset_ids(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Markdown help text for dataset `id`
    fn read_dataset_help(&self, id: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Persisted user settings
pub trait SettingsStore: Send + Sync + 'static {
    fn load_settings(&self) -> impl Future<Output = Result<Settings>> + Send;

    fn save_settings(&self, settings: &Settings) -> impl Future<Output = Result<()>> + Send;
}

/// A window's private key-value storage
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
