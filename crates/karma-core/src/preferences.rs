//! View preferences behind a small key/value store.
//!
//! Values persist as `"1"`/`"0"` strings:
//! - `ka:pref:classical`: classical (Sanskrit) labels instead of plain ones
//! - `ka:section:<name>`: whether a result section is expanded
//!
//! An absent key keeps the initial value: plain labels, sections expanded.

use crate::error::{KarmaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CLASSICAL_KEY: &str = "ka:pref:classical";
pub const SECTION_PREFIX: &str = "ka:section:";

pub fn section_key(name: &str) -> String {
    format!("{}{}", SECTION_PREFIX, name)
}

fn encode(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}

/// Absent keys keep `initial`; anything other than `"1"` reads as off.
fn decode(value: Option<String>, initial: bool) -> bool {
    match value {
        None => initial,
        Some(v) => v == "1",
    }
}

/// Persistence boundary for preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object of string values on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; a
    /// malformed one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring malformed preferences file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json).map_err(|e| {
            KarmaError::Preferences(format!("cannot write {}: {}", self.path.display(), e))
        })
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Preferences value passed to whatever renders results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Classical labels (Sthāna Bala) instead of plain ones (Positional)
    pub classical_labels: bool,
    /// Section name -> expanded
    pub sections: BTreeMap<String, bool>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            classical_labels: false,
            sections: BTreeMap::new(),
        }
    }
}

impl UserPreferences {
    /// Read the classical toggle plus the named sections.
    pub fn load(store: &dyn PreferenceStore, sections: &[&str]) -> Self {
        Self {
            classical_labels: decode(store.get(CLASSICAL_KEY), false),
            sections: sections
                .iter()
                .map(|name| (name.to_string(), decode(store.get(&section_key(name)), true)))
                .collect(),
        }
    }

    /// Write every known toggle back.
    pub fn save(&self, store: &mut dyn PreferenceStore) -> Result<()> {
        store.set(CLASSICAL_KEY, encode(self.classical_labels))?;
        for (name, open) in &self.sections {
            store.set(&section_key(name), encode(*open))?;
        }
        Ok(())
    }

    pub fn is_open(&self, section: &str) -> bool {
        self.sections.get(section).copied().unwrap_or(true)
    }

    pub fn is_collapsed(&self, section: &str) -> bool {
        !self.is_open(section)
    }

    /// Flip a section and return its new expanded state.
    pub fn toggle_section(&mut self, section: &str) -> bool {
        let open = !self.is_open(section);
        self.sections.insert(section.to_string(), open);
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values_when_absent() {
        let store = MemoryStore::new();
        let prefs = UserPreferences::load(&store, &["shadbala"]);
        assert!(!prefs.classical_labels);
        assert!(prefs.is_open("shadbala"));
        assert!(prefs.is_open("never-seen"));
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let mut prefs = UserPreferences::load(&store, &["shadbala", "dashas"]);
        prefs.classical_labels = true;
        assert!(!prefs.toggle_section("dashas"));
        prefs.save(&mut store).unwrap();

        assert_eq!(store.get(CLASSICAL_KEY).as_deref(), Some("1"));
        assert_eq!(store.get("ka:section:dashas").as_deref(), Some("0"));
        assert_eq!(store.get("ka:section:shadbala").as_deref(), Some("1"));

        let back = UserPreferences::load(&store, &["shadbala", "dashas"]);
        assert_eq!(back, prefs);
        assert!(back.is_collapsed("dashas"));
    }

    #[test]
    fn test_non_one_values_read_as_off() {
        let mut store = MemoryStore::new();
        store.set(CLASSICAL_KEY, "true").unwrap();
        store.set(&section_key("acg"), "").unwrap();
        let prefs = UserPreferences::load(&store, &["acg"]);
        assert!(!prefs.classical_labels);
        assert!(prefs.is_collapsed("acg"));
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = FileStore::open(&path).unwrap();
        assert!(store.get(CLASSICAL_KEY).is_none());
        store.set(CLASSICAL_KEY, "1").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(CLASSICAL_KEY).as_deref(), Some("1"));
    }

    #[test]
    fn test_file_store_malformed_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.get(CLASSICAL_KEY).is_none());
    }
}
