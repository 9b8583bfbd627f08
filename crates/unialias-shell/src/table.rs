//! Placeholder alias table standing in for the real matching engine.
//!
//! Reads every `*.csv` file in the dataset directory as `alias,character`
//! lines and matches by plain prefix. Each dataset `<id>.csv` may come with
//! a `<id>.md` help page.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};
use unialias_core::services::{DatasetCatalog, MatchEngine};
use unialias_core::{Candidate, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    alias: String,
    value: String,
}

pub struct AliasTable {
    dir: PathBuf,
    /// `None` until a dataset was loaded
    entries: RwLock<Option<Vec<Entry>>>,
}

impl AliasTable {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            entries: RwLock::new(None),
        }
    }

    fn lookup(&self, alias: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()?
            .iter()
            .find(|entry| entry.alias == alias)
            .map(|entry| entry.value.clone())
    }

    async fn dataset_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut dir = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::DatasetLoadFailed(format!("{}: {e}", self.dir.display())))?;

        let mut files = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "csv")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                files.push((stem.to_string(), path));
            }
        }
        files.sort();
        Ok(files)
    }
}

fn parse_csv(content: &str, source: &Path) -> Vec<Entry> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|(number, line)| {
            let Some((alias, value)) = line.split_once(',') else {
                warn!("{}:{}: expected alias,character", source.display(), number + 1);
                return None;
            };
            Some(Entry {
                alias: alias.trim().to_string(),
                value: value.trim().to_string(),
            })
        })
        .collect()
}

impl MatchEngine for AliasTable {
    async fn query_matches(&self, text: &str, max_count: usize) -> Result<Vec<Candidate>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let Some(entries) = entries.as_ref() else {
            return Err(Error::EngineUnavailable("no dataset loaded".to_string()));
        };

        let mut matches: Vec<_> = entries
            .iter()
            .filter(|entry| entry.alias.starts_with(text))
            .collect();
        matches.sort_by(|a, b| {
            a.alias
                .len()
                .cmp(&b.alias.len())
                .then_with(|| a.alias.cmp(&b.alias))
        });

        Ok(matches
            .into_iter()
            .take(max_count)
            .map(|entry| Candidate::new(entry.alias.clone(), text.len(), entry.value.clone()))
            .collect())
    }

    /// Prints the character instead of typing it into another application.
    async fn select_alias(&self, alias: &str) -> Result<()> {
        match self.lookup(alias) {
            Some(value) => println!("=> {value}  ({alias})"),
            None => warn!("Selected alias {alias} is not in the table"),
        }
        Ok(())
    }

    async fn reload_dataset(&self) -> Result<()> {
        let mut loaded = Vec::new();
        for (id, path) in self.dataset_files().await? {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::DatasetLoadFailed(format!("{}: {e}", path.display())))?;
            let entries = parse_csv(&content, &path);
            debug!("Dataset {id}: {} aliases", entries.len());
            loaded.extend(entries);
        }
        info!("Loaded {} aliases from {}", loaded.len(), self.dir.display());
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded);
        Ok(())
    }
}

impl DatasetCatalog for AliasTable {
    async fn list_dataset_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .dataset_files()
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    async fn read_dataset_help(&self, id: &str) -> Result<String> {
        let path = self.dir.join(format!("{id}.md"));
        Ok(tokio::fs::read_to_string(path).await?)
    }
}
