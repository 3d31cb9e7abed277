//! Multi-select state for bulk actions (delete, export).
//!
//! The set is never persisted. Every mutation publishes the full id → selected
//! mapping through a `watch` channel: observers always see the latest mapping and
//! intermediate states may be skipped.

use crate::model::NoteMetadata;
use std::collections::HashMap;
use tokio::sync::watch;

pub type SelectionMap = HashMap<i64, bool>;

#[derive(Debug)]
pub struct SelectionSet {
    selected: SelectionMap,
    tx: watch::Sender<SelectionMap>,
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionSet {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SelectionMap::new());
        Self {
            selected: SelectionMap::new(),
            tx,
        }
    }

    /// Flips membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: i64) -> bool {
        let now = if self.is_selected(id) {
            self.selected.remove(&id);
            false
        } else {
            self.selected.insert(id, true);
            true
        };
        self.publish();
        now
    }

    pub fn select_all(&mut self, notes: &[NoteMetadata]) {
        for m in notes {
            self.selected.insert(m.metadata_id, true);
        }
        self.publish();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.publish();
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.get(&id).copied().unwrap_or(false)
    }

    /// Selected ids in ascending order.
    pub fn selected_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .selected
            .iter()
            .filter_map(|(id, on)| on.then_some(*id))
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_empty(&self) -> bool {
        !self.selected.values().any(|on| *on)
    }

    /// Keeps only the selected entries of `notes`, preserving their order.
    pub fn filter(&self, notes: &[NoteMetadata]) -> Vec<NoteMetadata> {
        notes
            .iter()
            .filter(|m| self.is_selected(m.metadata_id))
            .cloned()
            .collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionMap> {
        self.tx.subscribe()
    }

    fn publish(&self) {
        self.tx.send_replace(self.selected.clone());
    }
}
