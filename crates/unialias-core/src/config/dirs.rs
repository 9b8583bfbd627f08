use directories::ProjectDirs;
use std::path::PathBuf;
use unialias_types::WindowLabel;

/// Application directories following the platform conventions
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/unialias)
    pub config: PathBuf,

    /// Data directory (~/.local/share/unialias)
    pub data: PathBuf,

    /// Per-window local storage files
    pub storage: PathBuf,

    /// Default dataset directory
    pub datasets: PathBuf,

    /// Settings file path
    pub settings_file: PathBuf,
}

impl Directories {
    /// Standard per-user paths, or `None` if the system has no home directory.
    #[must_use]
    pub fn new() -> Option<Self> {
        let project = ProjectDirs::from("", "", "unialias")?;
        let config = project.config_dir().to_path_buf();
        let data = project.data_dir().to_path_buf();

        Some(Self {
            settings_file: config.join("settings.json"),
            storage: data.join("storage"),
            datasets: data.join("dataset"),
            config,
            data,
        })
    }

    /// Everything under one directory (tests, `--base-dir`)
    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            settings_file: base.join("settings.json"),
            storage: base.join("storage"),
            datasets: base.join("dataset"),
            config: base.clone(),
            data: base,
        }
    }

    /// Local storage file of window `label`
    #[must_use]
    pub fn storage_file(&self, label: WindowLabel) -> PathBuf {
        self.storage.join(format!("{}.json", label.as_str()))
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        std::fs::create_dir_all(&self.storage)?;
        std::fs::create_dir_all(&self.datasets)?;
        Ok(())
    }
}
