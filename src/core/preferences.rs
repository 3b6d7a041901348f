//! Key-value preferences
//!
//! A flat string-to-string store persisted as JSON at
//! `<data dir>/Diallaleh/preferences.json` (on macOS,
//! `~/Library/Application Support/Diallaleh/preferences.json`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "Diallaleh";
const PREFERENCES_FILE: &str = "preferences.json";

/// On-disk layout: `{ "strings": { "key": "value", ... } }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(default)]
    strings: BTreeMap<String, String>,
}

/// String preferences backed by a JSON file
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    stored: StoredPreferences,
}

impl Preferences {
    /// Get the app data directory, creating it if needed
    pub fn app_data_dir() -> Result<PathBuf, String> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| "Could not determine data directory".to_string())?;

        let app_dir = data_dir.join(APP_DIR_NAME);

        if !app_dir.exists() {
            fs::create_dir_all(&app_dir)
                .map_err(|e| format!("Failed to create app data directory: {}", e))?;
        }

        Ok(app_dir)
    }

    /// Open the default preferences file
    pub fn load_default() -> Result<Self, String> {
        let path = Self::app_data_dir()?.join(PREFERENCES_FILE);
        Ok(Self::open(path))
    }

    /// Open preferences stored at `path`
    ///
    /// A missing file yields an empty store; it will be created on the next
    /// `save`. An unreadable file is moved aside to `<name>.bak` first so the
    /// next `save` doesn't destroy it.
    pub fn open(path: PathBuf) -> Self {
        if !path.exists() {
            log::debug!("No preferences at {:?}, starting empty", path);
            return Self {
                path,
                stored: StoredPreferences::default(),
            };
        }

        let stored = match Self::read_stored(&path) {
            Ok(stored) => {
                log::debug!("Loaded preferences from {:?}", path);
                stored
            }
            Err(e) => {
                log::warn!("{}; starting with empty preferences", e);
                Self::move_aside(&path);
                StoredPreferences::default()
            }
        };

        Self { path, stored }
    }

    fn read_stored(path: &Path) -> Result<StoredPreferences, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read preferences: {}", e))?;

        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse preferences: {}", e))
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".bak");
        path.with_file_name(name)
    }

    fn move_aside(path: &Path) {
        let backup = Self::backup_path(path);
        match fs::rename(path, &backup) {
            Ok(()) => log::warn!("Moved unreadable preferences to {:?}", backup),
            Err(e) => log::error!("Could not move unreadable preferences aside: {}", e),
        }
    }

    /// Get a string value, or `default` when the key is absent
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.stored
            .strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn put_string(&mut self, key: &str, value: impl Into<String>) {
        self.stored.strings.insert(key.to_string(), value.into());
    }

    /// Write all values to disk
    pub fn save(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create preferences directory: {}", e))?;
            }
        }

        let json = serde_json::to_string_pretty(&self.stored)
            .map_err(|e| format!("Failed to serialize preferences: {}", e))?;

        fs::write(&self.path, json).map_err(|e| format!("Failed to write preferences: {}", e))?;

        log::debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = Preferences::open(temp_dir.path().join("none.json"));
        assert_eq!(prefs.get_string("anything", "fallback"), "fallback");
    }

    #[test]
    fn test_put_save_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prefs.json");

        let mut prefs = Preferences::open(path.clone());
        prefs.put_string("key", "value");
        prefs.save().unwrap();
        assert!(path.exists());

        let reopened = Preferences::open(path);
        assert_eq!(reopened.get_string("key", ""), "value");
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let prefs = Preferences::open(path);
        assert_eq!(prefs.get_string("key", "default"), "default");
    }

    #[test]
    fn test_corrupt_file_is_kept_as_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let mut prefs = Preferences::open(path.clone());
        prefs.put_string("key", "value");
        prefs.save().unwrap();

        let backup = temp_dir.path().join("prefs.json.bak");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{not json");
        assert_eq!(Preferences::open(path).get_string("key", ""), "value");
    }

    #[test]
    fn test_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, r#"{ "strings": { "converted_files": "/a.mp3," } }"#).unwrap();

        let prefs = Preferences::open(path);
        assert_eq!(prefs.get_string("converted_files", ""), "/a.mp3,");
    }

    #[test]
    fn test_put_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open(temp_dir.path().join("prefs.json"));
        prefs.put_string("key", "old");
        prefs.put_string("key", "new");
        assert_eq!(prefs.get_string("key", ""), "new");
    }
}
