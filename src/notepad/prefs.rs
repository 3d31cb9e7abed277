//! # Preference Store
//!
//! User-facing settings: list sort order, theme and layout flags, first-run flags,
//! the logged-in identity and the export filename format.
//!
//! Preferences are a single [`Prefs`] value held in a `tokio::sync::watch` channel.
//! Readers either take a snapshot with [`PreferenceStore::get`] or subscribe and
//! react to changes (the metadata feed re-sorts when `sort_order` moves). Writes go
//! through [`PreferenceStore::update`], which persists to `prefs.json` before
//! publishing, so a subscriber never sees a value that is not on disk.
//!
//! Keys can also be addressed by name ([`PreferenceStore::get_key`] and
//! [`PreferenceStore::set_key`]) for hosts that expose raw settings, like the
//! CLI's `prefs` command.

use crate::error::{NotepadError, Result};
use crate::model::{FilenameFormat, SortOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

const PREFS_FILENAME: &str = "prefs.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    pub sort_order: SortOrder,
    pub is_light_theme: bool,
    pub background_color: String,
    pub rtl_layout: bool,
    pub first_run_complete: bool,
    pub first_view_complete: bool,
    pub show_double_tap_message: bool,
    /// Empty when logged out.
    pub user_name: String,
    pub user_id: String,
    pub filename_format: FilenameFormat,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            sort_order: SortOrder::default(),
            is_light_theme: true,
            background_color: "#ffffff".to_string(),
            rtl_layout: false,
            first_run_complete: false,
            first_view_complete: false,
            show_double_tap_message: true,
            user_name: String::new(),
            user_id: String::new(),
            filename_format: FilenameFormat::default(),
        }
    }
}

#[derive(Debug)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    tx: watch::Sender<Prefs>,
}

impl PreferenceStore {
    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::with_prefs(None, Prefs::default())
    }

    /// Loads `prefs.json` from `dir`, falling back to defaults when it does not exist.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(PREFS_FILENAME);
        let prefs = if path.exists() {
            let content = fs::read_to_string(&path).map_err(NotepadError::Io)?;
            serde_json::from_str(&content).map_err(NotepadError::Serialization)?
        } else {
            Prefs::default()
        };
        tracing::debug!(path = %path.display(), "preferences loaded");
        Ok(Self::with_prefs(Some(path), prefs))
    }

    fn with_prefs(path: Option<PathBuf>, prefs: Prefs) -> Self {
        let (tx, _rx) = watch::channel(prefs);
        Self { path, tx }
    }

    /// Snapshot of the current preferences.
    pub fn get(&self) -> Prefs {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Prefs> {
        self.tx.subscribe()
    }

    /// Applies `f` to a copy of the preferences. Persists and publishes only when
    /// something actually changed.
    pub fn update<F: FnOnce(&mut Prefs)>(&self, f: F) -> Result<()> {
        let mut next = self.get();
        f(&mut next);
        if next == *self.tx.borrow() {
            return Ok(());
        }

        self.persist(&next)?;
        self.tx.send_replace(next);
        Ok(())
    }

    /// Current value of a preference by name, `None` for unknown keys.
    pub fn get_key(&self, key: &str) -> Result<Option<Value>> {
        let value = serde_json::to_value(self.get()).map_err(NotepadError::Serialization)?;
        Ok(value.get(key).cloned())
    }

    /// Sets a preference by name. Text settings (including `sort_order`) take `raw`
    /// verbatim. Other settings read it as JSON (`true`, `3`).
    pub fn set_key(&self, key: &str, raw: &str) -> Result<()> {
        let mut value = serde_json::to_value(self.get()).map_err(NotepadError::Serialization)?;
        let Some(map) = value.as_object_mut() else {
            return Err(NotepadError::Api("Preferences are not an object".to_string()));
        };
        if !map.contains_key(key) {
            return Err(NotepadError::Api(format!("Unknown preference '{}'", key)));
        }

        let parsed = match map.get(key) {
            Some(Value::String(_)) => Value::String(raw.to_string()),
            _ => serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
        };
        map.insert(key.to_string(), parsed);

        let next: Prefs = serde_json::from_value(value)
            .map_err(|e| NotepadError::Api(format!("Invalid value for '{}': {}", key, e)))?;
        self.update(|prefs| *prefs = next)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, prefs: &Prefs) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(NotepadError::Io)?;
        }
        let content = serde_json::to_string_pretty(prefs).map_err(NotepadError::Serialization)?;
        fs::write(path, content).map_err(NotepadError::Io)?;
        Ok(())
    }
}
