use crate::error::{NotepadError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DB_FILE: &str = "notes.sqlite";
const DEFAULT_EXPORT_EXT: &str = ".txt";

/// Host configuration, stored as `config.json` in the data directory.
///
/// User-facing settings (sort order, theme, identity) live in the preference
/// store instead; see [`crate::prefs`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotepadConfig {
    /// Database file name, relative to the data directory
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// Extension for exported notes (e.g. ".txt", ".md")
    #[serde(default = "default_export_ext")]
    pub export_ext: String,

    /// Extensions picked up when importing a directory
    #[serde(default = "default_import_ext")]
    pub import_extensions: Vec<String>,
}

fn default_db_file() -> String {
    DEFAULT_DB_FILE.to_string()
}

fn default_export_ext() -> String {
    DEFAULT_EXPORT_EXT.to_string()
}

fn default_import_ext() -> Vec<String> {
    vec![".txt".to_string(), ".md".to_string(), ".text".to_string()]
}

impl Default for NotepadConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
            export_ext: default_export_ext(),
            import_extensions: default_import_ext(),
        }
    }
}

impl NotepadConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotepadError::Io)?;
        let mut config: NotepadConfig =
            serde_json::from_str(&content).map_err(NotepadError::Serialization)?;
        let ext = config.export_ext.clone();
        config.set_export_ext(&ext);
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir).map_err(NotepadError::Io)?;

        let content = serde_json::to_string_pretty(self).map_err(NotepadError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content).map_err(NotepadError::Io)?;
        Ok(())
    }

    pub fn export_ext(&self) -> &str {
        &self.export_ext
    }

    /// Set the export extension (normalizes to start with a dot)
    pub fn set_export_ext(&mut self, ext: &str) {
        if ext.is_empty() || ext.starts_with('.') {
            self.export_ext = ext.to_string();
        } else {
            self.export_ext = format!(".{}", ext);
        }
    }
}
