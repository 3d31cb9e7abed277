//! # Storage Layer
//!
//! This module defines the storage abstraction for notes. The [`NoteStore`] trait
//! allows the application to work with different storage backends.
//!
//! ## Implementations
//!
//! - [`sqlite::SqliteStore`]: Production storage
//!   - One `notes` table, created on first open
//!   - WAL journal mode, so a reader never blocks the writer
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Fast, isolated test execution
//!
//! ## What Lives Here and What Doesn't
//!
//! Stores are raw: they insert, replace, delete and select rows. Policy, such as
//! "a note without text or draft is deleted instead of written", belongs to
//! `commands/`. This keeps every backend trivially correct.
//!
//! ## Change Observation
//!
//! Every mutating call bumps a [`Revision`]. Subscribers (see [`crate::feed`]) hold a
//! `watch` receiver and re-query only when the revision moved. A `watch` channel keeps
//! just the latest value, so a burst of writes collapses into one refresh.
//!
//! ## Table Layout
//!
//! ```text
//! notes
//! ├── id          INTEGER PRIMARY KEY AUTOINCREMENT
//! ├── text        TEXT     saved body
//! ├── date        INTEGER  epoch millis
//! ├── draft_text  TEXT     pending draft, '' when none
//! └── title       TEXT     derived from text, for listings
//! ```

use crate::error::Result;
use crate::model::{Note, NoteMetadata, SortOrder};
use tokio::sync::watch;

pub mod memory;
pub mod sqlite;

/// Abstract interface for note storage.
pub trait NoteStore {
    /// Fetch a note by id. `Ok(None)` when the id is absent.
    fn get_note(&self, id: i64) -> Result<Option<Note>>;

    /// Fetch several notes. Absent ids are skipped; order is unspecified.
    fn get_notes(&self, ids: &[i64]) -> Result<Vec<Note>>;

    /// Insert a new row, ignoring `note.id`. Returns the generated id.
    fn insert_note(&mut self, note: &Note) -> Result<i64>;

    /// Replace the row with `note.id`, creating it if it is missing.
    fn update_note(&mut self, note: &Note) -> Result<()>;

    /// Delete rows by id. Absent ids are ignored. Returns how many rows went away.
    fn delete_notes(&mut self, ids: &[i64]) -> Result<usize>;

    /// List metadata for every note, ordered by `sort`.
    fn list_metadata(&self, sort: SortOrder) -> Result<Vec<NoteMetadata>>;

    /// Load every note with its body.
    fn list_notes(&self) -> Result<Vec<Note>>;

    /// Id of a note carrying a draft. With several, the one with the newest note `date`
    /// wins, ties going to the higher id. A draft does not move the note's `date`, so
    /// this is the most recently saved note with a draft, not the newest draft.
    fn latest_draft_id(&self) -> Result<Option<i64>>;

    /// Subscribe to the store revision, bumped after every mutation.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Monotonic change counter shared with subscribers.
#[derive(Debug)]
pub struct Revision {
    tx: watch::Sender<u64>,
}

impl Default for Revision {
    fn default() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }
}

impl Revision {
    pub fn bump(&self) {
        self.tx.send_modify(|rev| *rev += 1);
    }

    pub fn current(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_bumps_without_subscribers() {
        let rev = Revision::default();
        rev.bump();
        rev.bump();
        assert_eq!(rev.current(), 2);
    }

    #[test]
    fn test_subscriber_sees_latest_revision() {
        let rev = Revision::default();
        let mut rx = rev.subscribe();
        assert!(!rx.has_changed().unwrap());

        rev.bump();
        rev.bump();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);
        assert!(!rx.has_changed().unwrap());
    }
}
