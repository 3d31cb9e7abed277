//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single entry
//! point for a host shell, whatever that shell is.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Owns session state**: the note being edited and the editor text ([`DraftSession`]),
//!   the multi-select set ([`SelectionSet`]), preferences and the event log
//! - **Records events** for user actions that are tallied
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or file formatting. Documents come in and
//!   go out through [`DocumentSource`] and [`DocumentSink`].
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Single Owner
//!
//! Every mutating method takes `&mut self`. The session slots are never shared, so there
//! is no locking here. Concurrent writers to the same database resolve as last write wins.
//!
//! ## Generic Over NoteStore
//!
//! `NotepadApi<S: NoteStore>` is generic over the storage backend:
//! - Production: `NotepadApi<SqliteStore>`
//! - Testing: `NotepadApi<InMemoryStore>`

use crate::commands::{
    self, count_message, delete, export, get, import, save, search, CmdMessage, CmdResult,
    MSG_DOUBLE_TAP, MSG_EMPTY_NOTE, MSG_NOTE_SAVED,
};
use crate::config::NotepadConfig;
use crate::documents::{DocumentSink, DocumentSource};
use crate::draft::{DraftSession, DraftState};
use crate::error::Result;
use crate::events::{Event, EventLog};
use crate::feed::MetadataFeed;
use crate::model::{Note, NoteMetadata, NEW_NOTE_ID};
use crate::prefs::PreferenceStore;
use crate::selection::{SelectionMap, SelectionSet};
use crate::store::NoteStore;
use std::io::Write;
use tokio::sync::watch;
use uuid::Uuid;

/// The main API facade for notepad operations.
///
/// Generic over `NoteStore` to allow different storage backends.
/// All host shells (CLI, GUI, etc.) should interact through this API.
#[derive(Debug)]
pub struct NotepadApi<S: NoteStore> {
    store: S,
    prefs: PreferenceStore,
    events: EventLog,
    config: NotepadConfig,
    selection: SelectionSet,
    draft: DraftSession,
}

impl<S: NoteStore> NotepadApi<S> {
    pub fn new(store: S, prefs: PreferenceStore, events: EventLog, config: NotepadConfig) -> Self {
        Self {
            store,
            prefs,
            events,
            config,
            selection: SelectionSet::new(),
            draft: DraftSession::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }

    pub fn config(&self) -> &NotepadConfig {
        &self.config
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // --- Notes ---

    /// Saves `text` under `id` (`-1` creates). Empty text is refused with a warning.
    pub fn save_note(&mut self, id: i64, text: &str) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        if text.is_empty() {
            result.add_message(CmdMessage::warning(MSG_EMPTY_NOTE));
            return Ok(result);
        }

        let new_id = save::run(&mut self.store, id, text, None, "")?;
        if id == NEW_NOTE_ID {
            self.record(Event::NoteCreate { note_id: new_id });
        }

        if id != NEW_NOTE_ID && self.draft.note_state().id == id {
            self.draft.get_note(&self.store, Some(id))?;
        }

        let note = get::note(&self.store, new_id)?;
        result.affected_notes.push(note);
        result.add_message(CmdMessage::success(MSG_NOTE_SAVED));
        Ok(result)
    }

    /// Saves the editor text as the note being edited. A new note gets its id here and
    /// stays the one being edited.
    pub fn save_current_note(&mut self) -> Result<CmdResult> {
        let id = self.draft.note_state().id;
        let text = self.draft.text().to_string();
        let result = self.save_note(id, &text)?;
        if let Some(note) = result.affected_notes.first() {
            self.draft.get_note(&self.store, Some(note.id))?;
        }
        Ok(result)
    }

    /// Looks a note up for display. A missing id is reported, not an error.
    pub fn view_note(&self, id: i64) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        match self.store.get_note(id)? {
            Some(note) => result.affected_notes.push(note),
            None => result.add_message(CmdMessage::error(format!("Note {} not found", id))),
        }
        Ok(result)
    }

    pub fn get_notes(&self, metadata: &[NoteMetadata]) -> Result<Vec<Note>> {
        get::notes(&self.store, metadata)
    }

    pub fn saved_draft_id(&self) -> Result<Option<i64>> {
        self.store.latest_draft_id()
    }

    /// Hands the text to the host's share facility through [`CmdResult::shared_text`].
    pub fn share_note(&mut self, id: i64, text: &str) -> CmdResult {
        let mut result = CmdResult::default();
        if text.is_empty() {
            result.add_message(CmdMessage::warning(MSG_EMPTY_NOTE));
        } else {
            result.shared_text = Some(text.to_string());
        }
        self.record(Event::NoteShare { note_id: id });
        result
    }

    /// Loads the note for the host to render on paper.
    pub fn print_note(&mut self, id: i64) -> Result<CmdResult> {
        self.record(Event::NotePrint { note_id: id });
        let note = get::note(&self.store, id)?;
        let mut result = CmdResult::default();
        if note.text.is_empty() {
            result.add_message(CmdMessage::warning(MSG_EMPTY_NOTE));
        } else {
            result.affected_notes.push(note);
        }
        Ok(result)
    }

    pub fn export_note<K: DocumentSink + ?Sized>(
        &mut self,
        id: i64,
        metadata: &NoteMetadata,
        text: &str,
        sink: &mut K,
    ) -> Result<CmdResult> {
        let format = self.prefs.get().filename_format;
        let result = export::single(sink, metadata, text, format, self.config.export_ext())?;
        self.record(Event::NoteExport { note_id: id });
        Ok(result)
    }

    pub fn add_button_click(&mut self) {
        self.record(Event::AddButtonClick);
    }

    pub fn delete_note(&mut self, id: i64) -> Result<CmdResult> {
        delete::run(&mut self.store, &[id])
    }

    pub fn search(&self, term: &str) -> Result<CmdResult> {
        search::run(&self.store, term)
    }

    /// One-off listing in the current sort order.
    pub fn list_notes(&self) -> Result<CmdResult> {
        let sort = self.prefs.get().sort_order;
        let listed = self.store.list_metadata(sort)?;
        Ok(CmdResult::default().with_listed_notes(listed))
    }

    /// A feed that follows store changes and the sort-order preference.
    pub fn note_metadata(&self) -> MetadataFeed {
        MetadataFeed::new(&self.store, &self.prefs)
    }

    // --- Editor session ---

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.set_text(text);
    }

    pub fn text(&self) -> &str {
        self.draft.text()
    }

    pub fn note_state(&self) -> &Note {
        self.draft.note_state()
    }

    pub fn draft_state(&self) -> &DraftState {
        self.draft.state()
    }

    pub fn set_is_editing(&mut self, value: bool) {
        self.draft.set_is_editing(value);
    }

    pub fn clear_note(&mut self) {
        self.draft.clear_note();
    }

    pub fn get_note(&mut self, id: Option<i64>) -> Result<()> {
        self.draft.get_note(&self.store, id)
    }

    pub fn on_suspend(&mut self) -> Result<CmdResult> {
        self.draft.on_suspend(&mut self.store)
    }

    pub fn on_resume(&mut self) -> Result<CmdResult> {
        self.draft.on_resume(&mut self.store)
    }

    // --- Selection ---

    pub fn toggle_selected_note(&mut self, id: i64) -> bool {
        self.selection.toggle(id)
    }

    pub fn clear_selected_notes(&mut self) {
        self.selection.clear();
    }

    pub fn select_all_notes(&mut self, notes: &[NoteMetadata]) {
        self.selection.select_all(notes);
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selection.is_selected(id)
    }

    pub fn selected_notes(&self) -> Vec<i64> {
        self.selection.selected_ids()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<SelectionMap> {
        self.selection.subscribe()
    }

    /// Deletes every selected note, then clears the selection.
    pub fn delete_selected_notes(&mut self) -> Result<CmdResult> {
        let ids = self.selection.selected_ids();
        let result = delete::run(&mut self.store, &ids)?;
        self.selection.clear();
        Ok(result)
    }

    // --- Import / Export ---

    pub fn import_notes<D: DocumentSource>(&mut self, sources: &[D]) -> Result<CmdResult> {
        import::run(&mut self.store, sources)
    }

    /// Exports the selected entries of `metadata`. The selection is cleared once the
    /// notes are loaded. A single note takes the single-note path.
    pub fn export_notes<K: DocumentSink + ?Sized>(
        &mut self,
        metadata: &[NoteMetadata],
        sink: &mut K,
    ) -> Result<CmdResult> {
        let notes = self.take_selected(metadata)?;

        if let [note] = notes.as_slice() {
            return self.export_note(note.id, &note.metadata(), &note.text, sink);
        }

        let format = self.prefs.get().filename_format;
        export::batch(sink, &notes, format, self.config.export_ext())
    }

    /// Like [`export_notes`](Self::export_notes), written as one `.tar.gz` stream.
    pub fn export_archive<W: Write>(&mut self, metadata: &[NoteMetadata], writer: W) -> Result<CmdResult> {
        let notes = self.take_selected(metadata)?;
        let format = self.prefs.get().filename_format;
        let written = export::archive(writer, &notes, format, self.config.export_ext())?;

        let mut result = CmdResult::default();
        if written == 0 {
            result.add_message(CmdMessage::info("No notes to export."));
        } else {
            result.add_message(CmdMessage::success(count_message(
                written,
                "Note archived",
                "notes archived",
            )));
        }
        Ok(result)
    }

    /// Reads a document for display or editing. `None` when nothing could be read.
    pub fn load_file<D: DocumentSource + ?Sized>(&self, source: &D) -> Option<String> {
        import::load(source)
    }

    fn take_selected(&mut self, metadata: &[NoteMetadata]) -> Result<Vec<Note>> {
        let chosen = self.selection.filter(metadata);
        let notes = get::notes(&self.store, &chosen)?;
        self.selection.clear();
        Ok(notes)
    }

    // --- Identity and first-run flags ---

    pub fn login(&mut self, user_name: &str) -> Result<CmdResult> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Ok(CmdResult::default().with_message(CmdMessage::error("User name is empty")));
        }

        let user_id = Uuid::new_v4().to_string();
        self.prefs.update(|p| {
            p.user_name = user_name.to_string();
            p.user_id = user_id;
        })?;
        self.record(Event::UserLogin);

        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Logged in as {}",
            user_name
        ))))
    }

    pub fn logout(&mut self) -> Result<CmdResult> {
        self.prefs.update(|p| {
            p.user_id.clear();
            p.user_name.clear();
        })?;
        Ok(CmdResult::default().with_message(CmdMessage::success("Logged out")))
    }

    /// Empty when logged out.
    pub fn user_name(&self) -> String {
        self.prefs.get().user_name
    }

    pub fn first_run_complete(&self) -> Result<()> {
        self.prefs.update(|p| p.first_run_complete = true)
    }

    pub fn first_view_complete(&self) -> Result<()> {
        self.prefs.update(|p| p.first_view_complete = true)
    }

    pub fn double_tap_message_shown(&self) -> Result<CmdResult> {
        self.prefs.update(|p| p.show_double_tap_message = false)?;
        Ok(CmdResult::default().with_message(CmdMessage::info(MSG_DOUBLE_TAP)))
    }

    // --- Preferences by name ---

    pub fn get_preference(&self, key: &str) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        match self.prefs.get_key(key)? {
            Some(value) => result.add_message(CmdMessage::info(format!("{} = {}", key, value))),
            None => result.add_message(CmdMessage::error(format!("Unknown preference '{}'", key))),
        }
        Ok(result)
    }

    pub fn set_preference(&self, key: &str, value: &str) -> Result<CmdResult> {
        self.prefs.set_key(key, value)?;
        self.get_preference(key)
    }

    /// Event failures never fail the action that triggered them.
    fn record(&mut self, event: Event) {
        if let Err(e) = self.events.record(event) {
            tracing::warn!(event = event.name(), error = %e, "failed to record event");
        }
    }
}

pub use commands::{MessageLevel, MSG_DRAFT_RESTORED, MSG_DRAFT_SAVED};
