use super::{NoteStore, Revision};
use crate::error::{NotepadError, Result};
use crate::model::{derive_title, Note, NoteMetadata, SortOrder};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use tokio::sync::watch;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS notes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    text       TEXT    NOT NULL DEFAULT '',
    date       INTEGER NOT NULL,
    draft_text TEXT    NOT NULL DEFAULT '',
    title      TEXT    NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS notes_draft ON notes (draft_text) WHERE draft_text != '';";

/// SQLite-backed note storage.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    revision: Revision,
}

impl SqliteStore {
    /// Opens or creates the database at `path`, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(NotepadError::Io)?;
            }
        }

        let conn = Connection::open(path)?;
        // busy_timeout lets a second process wait for the writer instead of failing.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        tracing::debug!(path = %path.display(), "opened note database");
        Self::with_connection(conn)
    }

    /// Opens a throwaway in-memory database with the notes schema.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            revision: Revision::default(),
        })
    }
}

fn millis_to_date(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        text: row.get(1)?,
        date: millis_to_date(row.get(2)?),
        draft_text: row.get(3)?,
    })
}

impl NoteStore for SqliteStore {
    fn get_note(&self, id: i64) -> Result<Option<Note>> {
        let note = self
            .conn
            .query_row(
                "SELECT id, text, date, draft_text FROM notes WHERE id = ?1",
                [id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn get_notes(&self, ids: &[i64]) -> Result<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, text, date, draft_text FROM notes WHERE id = ?1")?;
        let mut notes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(note) = stmt.query_row([id], note_from_row).optional()? {
                notes.push(note);
            }
        }
        Ok(notes)
    }

    fn insert_note(&mut self, note: &Note) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO notes (text, date, draft_text, title) VALUES (?1, ?2, ?3, ?4)",
            params![
                note.text,
                note.date.timestamp_millis(),
                note.draft_text,
                derive_title(&note.text)
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "inserted note");
        self.revision.bump();
        Ok(id)
    }

    fn update_note(&mut self, note: &Note) -> Result<()> {
        self.conn.execute(
            "INSERT INTO notes (id, text, date, draft_text, title) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                text = excluded.text,
                date = excluded.date,
                draft_text = excluded.draft_text,
                title = excluded.title",
            params![
                note.id,
                note.text,
                note.date.timestamp_millis(),
                note.draft_text,
                derive_title(&note.text)
            ],
        )?;
        tracing::debug!(id = note.id, "updated note");
        self.revision.bump();
        Ok(())
    }

    fn delete_notes(&mut self, ids: &[i64]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare_cached("DELETE FROM notes WHERE id = ?1")?;
            for id in ids {
                removed += stmt.execute([id])?;
            }
        }
        tx.commit()?;

        tracing::debug!(requested = ids.len(), removed, "deleted notes");
        if removed > 0 {
            self.revision.bump();
        }
        Ok(removed)
    }

    fn list_metadata(&self, sort: SortOrder) -> Result<Vec<NoteMetadata>> {
        let mut stmt = self.conn.prepare("SELECT id, date, title FROM notes")?;
        let mut items: Vec<NoteMetadata> = stmt
            .query_map([], |row| {
                Ok(NoteMetadata {
                    metadata_id: row.get(0)?,
                    date: millis_to_date(row.get(1)?),
                    title: row.get(2)?,
                })
            })?
            .filter_map(|r| r.map_err(|e| tracing::warn!("Skipping malformed row: {e}")).ok())
            .collect();
        sort.sort(&mut items);
        Ok(items)
    }

    fn list_notes(&self) -> Result<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, text, date, draft_text FROM notes ORDER BY id")?;
        let notes = stmt
            .query_map([], note_from_row)?
            .filter_map(|r| r.map_err(|e| tracing::warn!("Skipping malformed row: {e}")).ok())
            .collect();
        Ok(notes)
    }

    fn latest_draft_id(&self) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM notes WHERE draft_text != ''
                 ORDER BY date DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
