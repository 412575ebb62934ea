//! Durable key/value storage for the reader's preferences
//!
//! Only one key is ever written (the language preference), but the store is
//! a plain string map so it can stand in for browser local storage.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default location of the preference file, relative to the site directory
pub const PREFERENCE_FILE: &str = ".blog-preferences.json";

/// Durable key/value storage
pub trait PreferenceStore: Send + Sync {
    /// Read a value, `None` when the key was never set
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Preferences persisted as a JSON object on disk
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store located in the site directory
    pub fn in_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self::new(base_dir.as_ref().join(PREFERENCE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored entry; a missing or corrupt file reads as empty
    fn load(&self) -> BTreeMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Ignoring corrupt preference file {:?}: {}", self.path, e);
                BTreeMap::new()
            }
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write preferences to {:?}", self.path))?;
        tracing::debug!("Saved preference {} = {}", key, value);

        Ok(())
    }
}

/// In-process store, forgotten on exit
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Preference store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
