use crate::error::Result;
use crate::model::{Note, NoteMetadata};
use crate::store::NoteStore;
use std::collections::HashMap;

/// Loads a note, degrading to an empty [`Note`] when the id is absent.
pub fn note<S: NoteStore>(store: &S, id: i64) -> Result<Note> {
    Ok(store.get_note(id)?.unwrap_or_default())
}

/// Hydrates metadata into full notes, preserving the input order.
/// Entries whose note disappeared in the meantime are skipped.
pub fn notes<S: NoteStore>(store: &S, metadata: &[NoteMetadata]) -> Result<Vec<Note>> {
    let ids: Vec<i64> = metadata.iter().map(|m| m.metadata_id).collect();
    let mut by_id: HashMap<i64, Note> = store
        .get_notes(&ids)?
        .into_iter()
        .map(|n| (n.id, n))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}
