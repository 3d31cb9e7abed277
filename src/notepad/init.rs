use crate::api::NotepadApi;
use crate::config::NotepadConfig;
use crate::error::{NotepadError, Result};
use crate::events::{EventLog, FileEventCounter};
use crate::prefs::PreferenceStore;
use crate::store::sqlite::SqliteStore;
use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};

/// Overrides the data directory, mostly for tests and portable installs.
pub const HOME_ENV: &str = "NOTEPAD_HOME";

pub struct NotepadContext {
    pub api: NotepadApi<SqliteStore>,
    pub data_dir: PathBuf,
}

/// Picks the data directory: `$NOTEPAD_HOME` when set, else the OS data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "notepad", "notepad")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NotepadError::Api("Could not determine data directory".to_string()))
}

/// Opens everything the API needs from one directory.
pub fn initialize(data_dir: &Path) -> Result<NotepadContext> {
    let config = NotepadConfig::load(data_dir)?;
    let store = SqliteStore::open(&data_dir.join(&config.db_file))?;
    let prefs = PreferenceStore::load(data_dir)?;
    let events = EventLog::new(Box::new(FileEventCounter::open(data_dir)?));
    tracing::debug!(dir = %data_dir.display(), "notepad initialized");

    Ok(NotepadContext {
        api: NotepadApi::new(store, prefs, events, config),
        data_dir: data_dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NEW_NOTE_ID;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_database() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("data");

        let mut ctx = initialize(&dir).unwrap();
        ctx.api.save_note(NEW_NOTE_ID, "persisted").unwrap();
        assert!(dir.join("notes.sqlite").exists());
        drop(ctx);

        let ctx = initialize(&dir).unwrap();
        let listed = ctx.api.list_notes().unwrap().listed_notes;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "persisted");
        assert_eq!(ctx.api.events().total(), 1);
    }

    #[test]
    fn test_initialize_honors_config_db_file() {
        let temp = TempDir::new().unwrap();
        let config = NotepadConfig {
            db_file: "other.db".to_string(),
            ..NotepadConfig::default()
        };
        config.save(temp.path()).unwrap();

        initialize(temp.path()).unwrap();
        assert!(temp.path().join("other.db").exists());
    }
}
