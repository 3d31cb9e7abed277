use crate::commands::{count_message, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::NoteStore;

/// Deletes notes by id. Absent ids are a no-op, not an error.
pub fn run<S: NoteStore>(store: &mut S, ids: &[i64]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if ids.is_empty() {
        result.add_message(CmdMessage::info("No notes selected."));
        return Ok(result);
    }

    let removed = store.delete_notes(ids)?;
    tracing::info!(requested = ids.len(), removed, "notes deleted");

    result.add_message(CmdMessage::success(count_message(
        ids.len(),
        "Note deleted",
        "notes deleted",
    )));
    Ok(result)
}
