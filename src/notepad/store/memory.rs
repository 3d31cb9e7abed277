use super::{NoteStore, Revision};
use crate::error::{NotepadError, Result};
use crate::model::{Note, NoteMetadata, SortOrder};
use std::collections::BTreeMap;
use tokio::sync::watch;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Debug)]
pub struct InMemoryStore {
    notes: BTreeMap<i64, Note>,
    next_id: i64,
    revision: Revision,
    simulate_write_error: bool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            notes: BTreeMap::new(),
            next_id: 1,
            revision: Revision::default(),
            simulate_write_error: false,
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, for exercising error propagation.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(NotepadError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl NoteStore for InMemoryStore {
    fn get_note(&self, id: i64) -> Result<Option<Note>> {
        Ok(self.notes.get(&id).cloned())
    }

    fn get_notes(&self, ids: &[i64]) -> Result<Vec<Note>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.notes.get(id).cloned())
            .collect())
    }

    fn insert_note(&mut self, note: &Note) -> Result<i64> {
        self.check_writable()?;
        let id = self.next_id;
        self.next_id += 1;
        self.notes.insert(
            id,
            Note {
                id,
                ..note.clone()
            },
        );
        self.revision.bump();
        Ok(id)
    }

    fn update_note(&mut self, note: &Note) -> Result<()> {
        self.check_writable()?;
        self.next_id = self.next_id.max(note.id + 1);
        self.notes.insert(note.id, note.clone());
        self.revision.bump();
        Ok(())
    }

    fn delete_notes(&mut self, ids: &[i64]) -> Result<usize> {
        self.check_writable()?;
        let removed = ids
            .iter()
            .filter(|id| self.notes.remove(*id).is_some())
            .count();
        if removed > 0 {
            self.revision.bump();
        }
        Ok(removed)
    }

    fn list_metadata(&self, sort: SortOrder) -> Result<Vec<NoteMetadata>> {
        let mut items: Vec<NoteMetadata> = self.notes.values().map(Note::metadata).collect();
        sort.sort(&mut items);
        Ok(items)
    }

    fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(self.notes.values().cloned().collect())
    }

    fn latest_draft_id(&self) -> Result<Option<i64>> {
        Ok(self
            .notes
            .values()
            .filter(|n| n.has_draft())
            .max_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)))
            .map(|n| n.id))
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_notes(mut self, count: usize) -> Self {
            for i in 0..count {
                let note = Note::new(format!("Test Note {}\n\nContent for note {}", i + 1, i + 1));
                self.store.insert_note(&note).unwrap();
            }
            self
        }

        pub fn with_note(mut self, text: &str) -> Self {
            self.store.insert_note(&Note::new(text)).unwrap();
            self
        }

        pub fn with_draft(mut self, text: &str, draft_text: &str) -> Self {
            let mut note = Note::new(text);
            note.draft_text = draft_text.to_string();
            self.store.insert_note(&note).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut store = InMemoryStore::new();
        let a = store.insert_note(&Note::new("a")).unwrap();
        let b = store.insert_note(&Note::new("b")).unwrap();
        assert_eq!((a, b), (1, 2));
        assert_eq!(store.get_note(b).unwrap().unwrap().text, "b");
    }

    #[test]
    fn test_update_then_insert_does_not_reuse_id() {
        let mut store = InMemoryStore::new();
        let mut note = Note::new("x");
        note.id = 10;
        store.update_note(&note).unwrap();
        assert_eq!(store.insert_note(&Note::new("y")).unwrap(), 11);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut store = StoreFixture::new().with_notes(1).store;
        assert_eq!(store.delete_notes(&[42]).unwrap(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_latest_draft_id() {
        let store = StoreFixture::new()
            .with_note("plain")
            .with_draft("", "draft one")
            .store;
        assert_eq!(store.latest_draft_id().unwrap(), Some(2));
    }

    #[test]
    fn test_latest_draft_follows_note_date_not_draft_order() {
        let mut store = InMemoryStore::new();
        let at = |secs| DateTime::from_timestamp(secs, 0).unwrap();

        let mut newer = Note::new("newer note");
        newer.date = at(2_000);
        newer.draft_text = "drafted first".to_string();
        let newer_id = store.insert_note(&newer).unwrap();

        let mut older = Note::new("older note");
        older.date = at(1_000);
        older.draft_text = "drafted last".to_string();
        store.insert_note(&older).unwrap();

        assert_eq!(store.latest_draft_id().unwrap(), Some(newer_id));
    }

    #[test]
    fn test_simulated_write_error() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);
        assert!(store.insert_note(&Note::new("x")).is_err());
    }
}
