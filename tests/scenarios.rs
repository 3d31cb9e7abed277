//! End-to-end flows through the public API, backed by real SQLite stores.

use notepad::api::{NotepadApi, MSG_DRAFT_RESTORED, MSG_DRAFT_SAVED};
use notepad::config::NotepadConfig;
use notepad::documents::{MemorySink, MemorySource};
use notepad::draft::DraftState;
use notepad::events::EventLog;
use notepad::model::{SortOrder, NEW_NOTE_ID};
use notepad::prefs::PreferenceStore;
use notepad::store::sqlite::SqliteStore;
use notepad::store::NoteStore;

fn api() -> NotepadApi<SqliteStore> {
    NotepadApi::new(
        SqliteStore::open_in_memory().unwrap(),
        PreferenceStore::in_memory(),
        EventLog::in_memory(),
        NotepadConfig::default(),
    )
}

#[test]
fn save_then_clear_removes_the_note() {
    let mut api = api();
    let id = api.save_note(NEW_NOTE_ID, "Hello").unwrap().affected_notes[0].id;
    assert_eq!(api.store().get_note(id).unwrap().unwrap().text, "Hello");

    // Editing the text away deletes the row
    api.delete_note(id).unwrap();
    assert!(api.store().get_note(id).unwrap().is_none());
    assert!(api.list_notes().unwrap().listed_notes.is_empty());
}

#[test]
fn draft_survives_a_restart() {
    let temp = tempfile::TempDir::new().unwrap();
    let db = temp.path().join("notes.sqlite");
    let mut api = NotepadApi::new(
        SqliteStore::open(&db).unwrap(),
        PreferenceStore::in_memory(),
        EventLog::in_memory(),
        NotepadConfig::default(),
    );
    let id = api.save_note(NEW_NOTE_ID, "Saved").unwrap().affected_notes[0].id;

    api.get_note(Some(id)).unwrap();
    api.set_is_editing(true);
    api.set_text("Saved, then more");
    let suspended = api.on_suspend().unwrap();
    assert!(suspended.has_message(MSG_DRAFT_SAVED));
    assert_eq!(api.draft_state(), &DraftState::DraftSaved(id));

    let stored = api.store().get_note(id).unwrap().unwrap();
    assert_eq!(stored.text, "Saved");
    assert_eq!(stored.draft_text, "Saved, then more");

    // Same database, fresh session
    drop(api);
    let mut api = NotepadApi::new(
        SqliteStore::open(&db).unwrap(),
        PreferenceStore::in_memory(),
        EventLog::in_memory(),
        NotepadConfig::default(),
    );
    let resumed = api.on_resume().unwrap();
    assert!(resumed.has_message(MSG_DRAFT_RESTORED));
    assert_eq!(api.text(), "Saved, then more");
    assert_eq!(api.note_state().id, id);

    // Not editing: the draft is dropped and the saved text is canonical again
    let stored = api.store().get_note(id).unwrap().unwrap();
    assert_eq!(stored.text, "Saved");
    assert!(stored.draft_text.is_empty());
    assert_eq!(api.draft_state(), &DraftState::Empty);
}

#[test]
fn import_skips_empty_and_unreadable_documents() {
    let mut api = api();
    let sources = vec![
        MemorySource::new("a.txt", "first"),
        MemorySource::new("b.txt", ""),
        MemorySource::unreadable("c.txt"),
        MemorySource::new("d.txt", "second"),
    ];

    let result = api.import_notes(&sources).unwrap();
    assert!(result.has_message("2 notes imported successfully"));
    assert!(result.has_message("Failed to import: c.txt"));
    assert_eq!(api.list_notes().unwrap().listed_notes.len(), 2);

    let nothing = api.import_notes(&[MemorySource::new("e.txt", "")]).unwrap();
    assert!(nothing.has_message("No notes imported."));
}

#[test]
fn selection_drives_bulk_export() {
    let mut api = api();
    for text in ["Alpha", "Beta", "Gamma"] {
        api.save_note(NEW_NOTE_ID, text).unwrap();
    }
    api.prefs()
        .update(|p| p.sort_order = SortOrder::TitleAscending)
        .unwrap();
    let listing = api.list_notes().unwrap().listed_notes;

    // Toggling twice is a no-op
    assert!(api.toggle_selected_note(listing[0].metadata_id));
    assert!(!api.toggle_selected_note(listing[0].metadata_id));
    assert!(api.selected_notes().is_empty());

    api.select_all_notes(&listing);
    assert_eq!(api.selected_notes().len(), 3);
    api.toggle_selected_note(listing[1].metadata_id);

    let mut sink = MemorySink::new();
    let result = api.export_notes(&listing, &mut sink).unwrap();
    assert!(result.has_message("2 notes exported to memory"));
    assert_eq!(sink.text("Alpha.txt"), Some("Alpha"));
    assert_eq!(sink.text("Gamma.txt"), Some("Gamma"));
    assert!(sink.text("Beta.txt").is_none());
    assert!(api.selected_notes().is_empty());
}

#[test]
fn feed_follows_store_and_sort_changes() {
    let mut api = api();
    let mut feed = api.note_metadata();
    assert!(feed.current(api.store()).unwrap().is_empty());

    api.save_note(NEW_NOTE_ID, "b note").unwrap();
    api.save_note(NEW_NOTE_ID, "A note").unwrap();
    let listed = feed.poll(api.store()).unwrap().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(feed.poll(api.store()).unwrap().is_none());

    api.set_preference("sort_order", "title-asc").unwrap();
    let resorted = feed.poll(api.store()).unwrap().unwrap();
    let titles: Vec<_> = resorted.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["A note", "b note"]);
}

#[test]
fn login_counts_as_an_event() {
    let mut api = api();
    assert!(api.login("   ").unwrap().has_message("User name is empty"));
    assert_eq!(api.events().total(), 0);
    api.login("Ada").unwrap();
    assert_eq!(api.user_name(), "Ada");
    assert!(!api.prefs().get().user_id.is_empty());
    assert_eq!(api.events().total(), 1);

    api.logout().unwrap();
    assert!(api.user_name().is_empty());
}
