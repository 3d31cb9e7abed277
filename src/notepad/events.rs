//! # Event Log
//!
//! User actions worth tallying (login, note creation, share, export, print, the
//! add button) are recorded as [`Event`]s. Recording does two things:
//!
//! - emits a structured `tracing` record with target `notepad::events`, so any
//!   subscriber the host installs can ship it elsewhere
//! - increments an [`EventCounter`], an injected service that keeps a running total
//!
//! Sending events to a third-party analytics service is the host's business. The
//! library only produces the records.

use crate::error::{NotepadError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const EVENTS_FILENAME: &str = "events.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    UserLogin,
    AddButtonClick,
    NoteCreate { note_id: i64 },
    NoteShare { note_id: i64 },
    NoteExport { note_id: i64 },
    NotePrint { note_id: i64 },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserLogin => "user_login",
            Event::AddButtonClick => "add_button_click",
            Event::NoteCreate { .. } => "note_create",
            Event::NoteShare { .. } => "note_share",
            Event::NoteExport { .. } => "note_export",
            Event::NotePrint { .. } => "note_print",
        }
    }

    pub fn note_id(&self) -> Option<i64> {
        match self {
            Event::UserLogin | Event::AddButtonClick => None,
            Event::NoteCreate { note_id }
            | Event::NoteShare { note_id }
            | Event::NoteExport { note_id }
            | Event::NotePrint { note_id } => Some(*note_id),
        }
    }
}

/// Running total of recorded events.
pub trait EventCounter {
    /// Adds one and returns the new total.
    fn increment(&mut self) -> Result<u64>;

    fn total(&self) -> u64;
}

#[derive(Debug, Default)]
pub struct MemoryEventCounter {
    total: u64,
}

impl MemoryEventCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventCounter for MemoryEventCounter {
    fn increment(&mut self) -> Result<u64> {
        self.total += 1;
        Ok(self.total)
    }

    fn total(&self) -> u64 {
        self.total
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CounterFile {
    total: u64,
}

/// Counter persisted as `events.json`, rewritten on every increment.
#[derive(Debug)]
pub struct FileEventCounter {
    path: PathBuf,
    total: u64,
}

impl FileEventCounter {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(EVENTS_FILENAME);
        let total = if path.exists() {
            let content = fs::read_to_string(&path).map_err(NotepadError::Io)?;
            serde_json::from_str::<CounterFile>(&content)
                .map_err(NotepadError::Serialization)?
                .total
        } else {
            0
        };
        Ok(Self { path, total })
    }
}

impl EventCounter for FileEventCounter {
    fn increment(&mut self) -> Result<u64> {
        let next = self.total + 1;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(NotepadError::Io)?;
        }
        let content = serde_json::to_string(&CounterFile { total: next })
            .map_err(NotepadError::Serialization)?;
        fs::write(&self.path, content).map_err(NotepadError::Io)?;
        self.total = next;
        Ok(next)
    }

    fn total(&self) -> u64 {
        self.total
    }
}

pub struct EventLog {
    counter: Box<dyn EventCounter + Send>,
}

impl EventLog {
    pub fn new(counter: Box<dyn EventCounter + Send>) -> Self {
        Self { counter }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryEventCounter::new()))
    }

    /// Records the event and returns the new total.
    pub fn record(&mut self, event: Event) -> Result<u64> {
        let total = self.counter.increment()?;
        match event.note_id() {
            Some(note_id) => {
                tracing::info!(target: "notepad::events", event = event.name(), note_id, total, "event")
            }
            None => tracing::info!(target: "notepad::events", event = event.name(), total, "event"),
        }
        Ok(total)
    }

    pub fn total(&self) -> u64 {
        self.counter.total()
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("total", &self.total())
            .finish()
    }
}
