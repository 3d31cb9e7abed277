//! # Draft Session
//!
//! The editor holds two slots: the note being edited (`note_state`, as last loaded
//! from the store) and the text currently in the editor. They diverge while the
//! user types. A draft is how that divergence survives the host going away.
//!
//! ```text
//!            set_text (non-empty)           on_suspend (editing, text differs)
//!   Empty ─────────────────────────► Editing ─────────────────────────────────► DraftSaved(id)
//!     ▲                                 ▲                                            │
//!     │        on_resume (not editing)  │          set_text                          │
//!     └─────────────────────────────────┴────────────────────────────────────────────┘
//! ```
//!
//! - [`DraftSession::on_suspend`] writes the editor text into the row's `draft_text`,
//!   keeping the saved `text` untouched.
//! - [`DraftSession::on_resume`] first restores the latest draft (once per session),
//!   then tidies up: a row without saved text is removed, and when the user is not
//!   editing, the saved text becomes canonical again and the draft is dropped.
//!
//! Storage errors propagate to the caller.

use crate::commands::{get, save, CmdMessage, CmdResult, MSG_DRAFT_RESTORED, MSG_DRAFT_SAVED};
use crate::error::Result;
use crate::model::Note;
use crate::store::NoteStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftState {
    #[default]
    Empty,
    Editing(String),
    DraftSaved(i64),
}

#[derive(Debug, Default)]
pub struct DraftSession {
    note_state: Note,
    text: String,
    is_editing: bool,
    restore_checked: bool,
    state: DraftState,
}

impl DraftSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_state(&self) -> &Note {
        &self.note_state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if !self.text.is_empty() || matches!(self.state, DraftState::Editing(_)) {
            self.state = DraftState::Editing(self.text.clone());
        }
    }

    pub fn set_is_editing(&mut self, value: bool) {
        self.is_editing = value;
    }

    /// Resets both slots.
    pub fn clear_note(&mut self) {
        self.note_state = Note::default();
        self.text.clear();
        self.state = DraftState::Empty;
    }

    /// Loads a note into `note_state`. An empty editor picks up the draft, or the
    /// saved text when there is no draft. `None` resets `note_state` only.
    pub fn get_note<S: NoteStore>(&mut self, store: &S, id: Option<i64>) -> Result<()> {
        let Some(id) = id else {
            self.note_state = Note::default();
            return Ok(());
        };

        self.note_state = get::note(store, id)?;
        if self.text.is_empty() {
            let text = if self.note_state.has_draft() {
                self.note_state.draft_text.clone()
            } else {
                self.note_state.text.clone()
            };
            self.set_text(text);
        }
        Ok(())
    }

    /// Host is going away: keep unsaved editor text as a draft.
    pub fn on_suspend<S: NoteStore>(&mut self, store: &mut S) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        if !self.is_editing || self.text.is_empty() {
            return Ok(result);
        }

        if self.note_state.text == self.text {
            result.add_message(CmdMessage::info(MSG_DRAFT_SAVED));
            return Ok(result);
        }

        let note = &self.note_state;
        let date = (!note.is_new()).then_some(note.date);
        let id = save::run(store, note.id, &note.text, date, &self.text)?;
        self.note_state = get::note(store, id)?;
        self.state = DraftState::DraftSaved(id);
        tracing::info!(id, "draft saved on suspend");

        result.add_message(CmdMessage::info(MSG_DRAFT_SAVED));
        Ok(result)
    }

    /// Host is back: restore the latest draft once per session, then clean up.
    pub fn on_resume<S: NoteStore>(&mut self, store: &mut S) -> Result<CmdResult> {
        let mut result = CmdResult::default();

        if !self.restore_checked {
            self.restore_checked = true;
            if let Some(id) = store.latest_draft_id()? {
                self.get_note(store, Some(id))?;
                tracing::info!(id, "draft restored");
                result.add_message(CmdMessage::info(MSG_DRAFT_RESTORED));
            }
        }

        let note = &self.note_state;
        if note.text.is_empty() {
            if !note.is_new() {
                store.delete_notes(&[note.id])?;
                tracing::debug!(id = note.id, "row without saved text removed");
            }
        } else if !self.is_editing {
            save::run(store, note.id, &note.text, Some(note.date), "")?;
            self.note_state.draft_text.clear();
        }

        if !self.is_editing {
            self.state = DraftState::Empty;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortOrder;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn suspend_without_editing_writes_nothing() {
        let mut store = InMemoryStore::new();
        let mut session = DraftSession::new();
        session.set_text("typed");

        let result = session.on_suspend(&mut store).unwrap();
        assert!(result.messages.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn suspend_and_resume_restores_draft_once() {
        let mut store = InMemoryStore::new();
        let mut session = DraftSession::new();
        session.set_is_editing(true);
        session.set_text("draft content");

        let suspended = session.on_suspend(&mut store).unwrap();
        assert!(suspended.has_message(MSG_DRAFT_SAVED));
        assert!(matches!(session.state(), DraftState::DraftSaved(_)));
        assert_eq!(store.latest_draft_id().unwrap(), Some(1));

        // A fresh session, as after a restart
        let mut session = DraftSession::new();
        let resumed = session.on_resume(&mut store).unwrap();
        assert!(resumed.has_message(MSG_DRAFT_RESTORED));
        assert_eq!(session.note_state().draft_text, "draft content");
        assert_eq!(session.text(), "draft content");

        let again = session.on_resume(&mut store).unwrap();
        assert!(!again.has_message(MSG_DRAFT_RESTORED));
    }

    #[test]
    fn suspend_with_unchanged_text_only_reports() {
        let mut store = StoreFixture::new().with_note("Saved").store;
        let mut session = DraftSession::new();
        session.get_note(&store, Some(1)).unwrap();
        session.set_is_editing(true);

        let result = session.on_suspend(&mut store).unwrap();
        assert!(result.has_message(MSG_DRAFT_SAVED));
        assert!(store.latest_draft_id().unwrap().is_none());
    }

    #[test]
    fn draft_keeps_saved_text_and_date() {
        let mut store = StoreFixture::new().with_note("Saved").store;
        let before = store.get_note(1).unwrap().unwrap();

        let mut session = DraftSession::new();
        session.get_note(&store, Some(1)).unwrap();
        session.set_is_editing(true);
        session.set_text("Saved plus edits");
        session.on_suspend(&mut store).unwrap();

        let after = store.get_note(1).unwrap().unwrap();
        assert_eq!(after.text, "Saved");
        assert_eq!(after.date, before.date);
        assert_eq!(after.draft_text, "Saved plus edits");
    }

    #[test]
    fn resume_when_not_editing_makes_saved_text_canonical() {
        let mut store = StoreFixture::new().with_draft("Saved", "pending").store;
        let mut session = DraftSession::new();

        let result = session.on_resume(&mut store).unwrap();
        assert!(result.has_message(MSG_DRAFT_RESTORED));
        assert_eq!(session.text(), "pending");

        let row = store.get_note(1).unwrap().unwrap();
        assert_eq!(row.text, "Saved");
        assert!(row.draft_text.is_empty());
        assert_eq!(session.state(), &DraftState::Empty);
    }

    #[test]
    fn resume_removes_row_without_saved_text() {
        let mut store = StoreFixture::new().with_draft("", "only a draft").store;
        let mut session = DraftSession::new();

        session.on_resume(&mut store).unwrap();
        assert_eq!(session.note_state().draft_text, "only a draft");
        assert!(store
            .list_metadata(SortOrder::DateDescending)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn get_note_prefers_draft_and_keeps_typed_text() {
        let store = StoreFixture::new()
            .with_draft("Saved", "pending")
            .with_note("Other")
            .store;

        let mut session = DraftSession::new();
        session.get_note(&store, Some(1)).unwrap();
        assert_eq!(session.text(), "pending");

        session.get_note(&store, Some(2)).unwrap();
        assert_eq!(session.note_state().text, "Other");
        assert_eq!(session.text(), "pending");

        session.get_note(&store, None).unwrap();
        assert!(session.note_state().is_new());
    }

    #[test]
    fn clear_note_resets_both_slots() {
        let store = StoreFixture::new().with_note("Saved").store;
        let mut session = DraftSession::new();
        session.get_note(&store, Some(1)).unwrap();

        session.clear_note();
        assert!(session.note_state().is_new());
        assert_eq!(session.text(), "");
        assert_eq!(session.state(), &DraftState::Empty);
    }

    #[test]
    fn storage_errors_propagate() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);

        let mut session = DraftSession::new();
        session.set_is_editing(true);
        session.set_text("words");
        assert!(session.on_suspend(&mut store).is_err());
    }
}
