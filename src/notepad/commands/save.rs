use crate::error::Result;
use crate::model::{Note, NEW_NOTE_ID};
use crate::store::NoteStore;
use chrono::{DateTime, Utc};

/// Persists a note and returns its id.
///
/// `id == -1` inserts a new row. Any other id replaces that row in full (last write wins).
/// A note with empty `text` and empty `draft_text` is deleted instead of written, and the
/// given id is returned unchanged.
pub fn run<S: NoteStore>(
    store: &mut S,
    id: i64,
    text: &str,
    date: Option<DateTime<Utc>>,
    draft_text: &str,
) -> Result<i64> {
    let note = Note {
        id,
        text: text.to_string(),
        date: date.unwrap_or_else(Utc::now),
        draft_text: draft_text.to_string(),
    };

    if note.is_blank() {
        if id != NEW_NOTE_ID {
            store.delete_notes(&[id])?;
            tracing::debug!(id, "blank note removed instead of saved");
        }
        return Ok(id);
    }

    if note.is_new() {
        store.insert_note(&note)
    } else {
        store.update_note(&note)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortOrder;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn inserts_new_note() {
        let mut store = InMemoryStore::new();
        let id = run(&mut store, NEW_NOTE_ID, "Hello", None, "").unwrap();
        assert!(id > 0);

        let note = store.get_note(id).unwrap().unwrap();
        assert_eq!(note.id, id);
        assert_eq!(note.text, "Hello");
    }

    #[test]
    fn updates_in_place() {
        let mut store = InMemoryStore::new();
        let id = run(&mut store, NEW_NOTE_ID, "Hello", None, "").unwrap();
        let same = run(&mut store, id, "Hello again", None, "").unwrap();

        assert_eq!(same, id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_note(id).unwrap().unwrap().text, "Hello again");
    }

    #[test]
    fn keeps_explicit_date() {
        let mut store = InMemoryStore::new();
        let date = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let id = run(&mut store, NEW_NOTE_ID, "x", Some(date), "").unwrap();
        assert_eq!(store.get_note(id).unwrap().unwrap().date, date);
    }

    #[test]
    fn empty_text_deletes_existing_note() {
        let mut store = InMemoryStore::new();
        let id = run(&mut store, NEW_NOTE_ID, "Hello", None, "").unwrap();

        run(&mut store, id, "", None, "").unwrap();
        run(&mut store, id, "", None, "").unwrap();

        assert!(store.get_note(id).unwrap().is_none());
        assert!(store
            .list_metadata(SortOrder::DateDescending)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn empty_new_note_is_never_stored() {
        let mut store = InMemoryStore::new();
        let id = run(&mut store, NEW_NOTE_ID, "", None, "").unwrap();
        assert_eq!(id, NEW_NOTE_ID);
        assert!(store.is_empty());
    }

    #[test]
    fn draft_only_note_is_kept() {
        let mut store = InMemoryStore::new();
        let id = run(&mut store, NEW_NOTE_ID, "", None, "unsaved words").unwrap();
        let note = store.get_note(id).unwrap().unwrap();
        assert_eq!(note.text, "");
        assert_eq!(note.draft_text, "unsaved words");
    }
}
