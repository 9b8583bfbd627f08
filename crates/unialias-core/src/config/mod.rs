mod dirs;
mod settings_file;
mod storage;

pub use dirs::Directories;
pub use settings_file::JsonSettingsStore;
pub use storage::{JsonFileStore, MemoryStore};
