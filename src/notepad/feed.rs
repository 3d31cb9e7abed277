//! Continuously updated note listings.
//!
//! A [`MetadataFeed`] watches two things: the store revision and the sort-order
//! preference. [`MetadataFeed::poll`] re-queries only when one of them moved since
//! the last read, so a host can call it on every frame or prompt without cost.
//!
//! Each feed keeps its own cursor. Two feeds over the same store see the same
//! changes independently, and a new feed always starts with a full listing.

use crate::error::Result;
use crate::model::{NoteMetadata, SortOrder};
use crate::prefs::{PreferenceStore, Prefs};
use crate::store::NoteStore;
use tokio::sync::watch;

#[derive(Debug)]
pub struct MetadataFeed {
    revision: watch::Receiver<u64>,
    prefs: watch::Receiver<Prefs>,
    last_sort: Option<SortOrder>,
}

impl MetadataFeed {
    pub fn new<S: NoteStore>(store: &S, prefs: &PreferenceStore) -> Self {
        Self {
            revision: store.subscribe(),
            prefs: prefs.subscribe(),
            last_sort: None,
        }
    }

    /// True when the next [`poll`](Self::poll) would return a listing.
    pub fn has_changed(&self) -> bool {
        match self.last_sort {
            None => true,
            Some(sort) => {
                self.revision.has_changed().unwrap_or(false) || self.prefs.borrow().sort_order != sort
            }
        }
    }

    /// A fresh listing when the store or the sort order changed, `None` otherwise.
    pub fn poll<S: NoteStore>(&mut self, store: &S) -> Result<Option<Vec<NoteMetadata>>> {
        if !self.has_changed() {
            return Ok(None);
        }
        self.current(store).map(Some)
    }

    /// Always re-queries, and marks the current state as seen.
    pub fn current<S: NoteStore>(&mut self, store: &S) -> Result<Vec<NoteMetadata>> {
        let revision = *self.revision.borrow_and_update();
        let sort = self.prefs.borrow().sort_order;
        self.last_sort = Some(sort);
        tracing::debug!(revision, %sort, "listing notes");
        store.list_metadata(sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::save;
    use crate::model::NEW_NOTE_ID;
    use crate::store::memory::fixtures::StoreFixture;

    fn titles(items: &[NoteMetadata]) -> Vec<&str> {
        items.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn first_poll_lists_everything() {
        let store = StoreFixture::new().with_notes(2).store;
        let prefs = PreferenceStore::in_memory();
        let mut feed = MetadataFeed::new(&store, &prefs);

        let first = feed.poll(&store).unwrap().unwrap();
        assert_eq!(first.len(), 2);
        assert!(feed.poll(&store).unwrap().is_none());
    }

    #[test]
    fn reflects_inserts_and_deletes() {
        let mut store = StoreFixture::new().with_notes(1).store;
        let prefs = PreferenceStore::in_memory();
        let mut feed = MetadataFeed::new(&store, &prefs);
        feed.poll(&store).unwrap();

        let id = save::run(&mut store, NEW_NOTE_ID, "Fresh", None, "").unwrap();
        assert_eq!(feed.poll(&store).unwrap().unwrap().len(), 2);

        store.delete_notes(&[id]).unwrap();
        assert_eq!(feed.poll(&store).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn resorts_when_sort_order_changes() {
        let store = StoreFixture::new()
            .with_note("banana")
            .with_note("Apple")
            .with_note("cherry")
            .store;
        let prefs = PreferenceStore::in_memory();
        prefs
            .update(|p| p.sort_order = SortOrder::TitleAscending)
            .unwrap();

        let mut feed = MetadataFeed::new(&store, &prefs);
        let listing = feed.poll(&store).unwrap().unwrap();
        assert_eq!(titles(&listing), vec!["Apple", "banana", "cherry"]);

        prefs
            .update(|p| p.sort_order = SortOrder::TitleDescending)
            .unwrap();
        let listing = feed.poll(&store).unwrap().unwrap();
        assert_eq!(titles(&listing), vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn unrelated_preference_change_does_not_requery() {
        let store = StoreFixture::new().with_notes(1).store;
        let prefs = PreferenceStore::in_memory();
        let mut feed = MetadataFeed::new(&store, &prefs);
        feed.poll(&store).unwrap();

        prefs.update(|p| p.rtl_layout = true).unwrap();
        assert!(feed.poll(&store).unwrap().is_none());
    }

    #[test]
    fn feeds_have_independent_cursors() {
        let mut store = StoreFixture::new().with_notes(1).store;
        let prefs = PreferenceStore::in_memory();
        let mut a = MetadataFeed::new(&store, &prefs);
        let mut b = MetadataFeed::new(&store, &prefs);
        a.poll(&store).unwrap();
        b.poll(&store).unwrap();

        save::run(&mut store, NEW_NOTE_ID, "More", None, "").unwrap();
        assert!(a.poll(&store).unwrap().is_some());
        assert!(b.has_changed());
    }
}
