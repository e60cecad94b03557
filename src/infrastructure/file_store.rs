use crate::application::services::SettingsStore;
use crate::domain::value_objects::{StoreKey, StoreValue, normalize_location};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

type Hive = BTreeMap<String, BTreeMap<String, StoreValue>>;

/// Registry-like store persisted as a single JSON document.
///
/// Every call goes back to disk, so changes made by another process are
/// visible on the next read. Writes rewrite the whole document without any
/// locking: with two concurrent editors the last writer wins.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Hive> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Hive::new()),
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Malformed settings hive {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Hive::new()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read settings hive {}", self.path.display())),
        }
    }

    fn save(&self, hive: &Hive) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(hive)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings hive {}", self.path.display()))
    }
}

impl SettingsStore for FileStore {
    fn read(&self, key: &StoreKey) -> Result<Option<StoreValue>> {
        let hive = self.load()?;
        let value = hive
            .get(&normalize_location(&key.location))
            .and_then(|values| values.get(&key.name))
            .cloned();
        debug!(%key, found = value.is_some(), "read");
        Ok(value)
    }

    fn write_all(&self, values: &[(StoreKey, StoreValue)]) -> Result<()> {
        let mut hive = self.load()?;
        for (key, value) in values {
            hive.entry(normalize_location(&key.location))
                .or_default()
                .insert(key.name.clone(), value.clone());
        }
        self.save(&hive)?;
        debug!(count = values.len(), hive = %self.path.display(), "wrote");
        Ok(())
    }

    fn location_exists(&self, location: &str) -> Result<bool> {
        Ok(self.load()?.contains_key(&normalize_location(location)))
    }
}
