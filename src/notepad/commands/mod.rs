//! # Command Layer
//!
//! Pure business logic, one module per operation. Commands take a [`NoteStore`]
//! and plain Rust arguments and return plain Rust values: no terminal, no
//! process exit, no assumptions about who is calling.
//!
//! User-facing notifications are not printed. They are collected as
//! [`CmdMessage`]s in a [`CmdResult`] and the host decides how to show them
//! (the CLI prints them, another shell might raise a transient popup).
//!
//! [`NoteStore`]: crate::store::NoteStore

use crate::model::{Note, NoteMetadata};

pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod save;
pub mod search;

pub const MSG_NOTE_SAVED: &str = "Note saved";
pub const MSG_EMPTY_NOTE: &str = "Empty note";
pub const MSG_DRAFT_SAVED: &str = "Draft saved";
pub const MSG_DRAFT_RESTORED: &str = "Draft restored";
pub const MSG_DOUBLE_TAP: &str = "Double-tap a note to start editing it";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_notes: Vec<Note>,
    pub listed_notes: Vec<NoteMetadata>,
    /// Text handed to the host's share facility.
    pub shared_text: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_notes(mut self, notes: Vec<Note>) -> Self {
        self.affected_notes = notes;
        self
    }

    pub fn with_listed_notes(mut self, notes: Vec<NoteMetadata>) -> Self {
        self.listed_notes = notes;
        self
    }

    /// Folds another result into this one, keeping message order.
    pub fn merge(&mut self, other: CmdResult) {
        self.affected_notes.extend(other.affected_notes);
        self.listed_notes.extend(other.listed_notes);
        if other.shared_text.is_some() {
            self.shared_text = other.shared_text;
        }
        self.messages.extend(other.messages);
    }

    pub fn has_message(&self, content: &str) -> bool {
        self.messages.iter().any(|m| m.content == content)
    }
}

/// Picks the singular or plural wording for a count-based notification.
pub(crate) fn count_message(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        one.to_string()
    } else {
        format!("{} {}", count, many)
    }
}
