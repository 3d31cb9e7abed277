//! # Domain Model
//!
//! Core data types: [`Note`], [`NoteMetadata`], [`SortOrder`] and [`FilenameFormat`].
//!
//! ## Notes and Drafts
//!
//! A note is a single row: `id`, `text`, `date` and `draft_text`. There is no separate
//! draft entity. A draft is a note whose `draft_text` is non-empty, written when the host
//! suspends with unsaved edits.
//!
//! The id `-1` ([`NEW_NOTE_ID`]) marks a note that has never been saved. Saving it
//! inserts a row and hands back the generated id.
//!
//! ## Titles
//!
//! Titles are never typed by the user. They are derived from the text:
//!
//! ```text
//! # Groceries      <-- first non-blank line
//! - eggs           <-- ignored for the title
//! ```
//!
//! Inline Markdown markup is stripped, so `# **Groceries**` becomes `Groceries`.
//! The derived title is stored next to the row so lists can be rendered without
//! loading every body.

use chrono::{DateTime, Utc};
use pulldown_cmark::{Event, Parser};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Id carried by a note that has not been persisted yet.
pub const NEW_NOTE_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub text: String,
    pub date: DateTime<Utc>,
    /// Unsaved edit kept across a suspend/resume cycle. Empty when there is none.
    pub draft_text: String,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            id: NEW_NOTE_ID,
            text: String::new(),
            date: DateTime::<Utc>::default(),
            draft_text: String::new(),
        }
    }
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            date: Utc::now(),
            ..Default::default()
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == NEW_NOTE_ID
    }

    pub fn has_draft(&self) -> bool {
        !self.draft_text.is_empty()
    }

    /// A note with neither saved text nor a draft is never retained.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && self.draft_text.is_empty()
    }

    pub fn title(&self) -> String {
        derive_title(&self.text)
    }

    pub fn metadata(&self) -> NoteMetadata {
        NoteMetadata {
            metadata_id: self.id,
            date: self.date,
            title: self.title(),
        }
    }
}

/// Lightweight projection used for list rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMetadata {
    pub metadata_id: i64,
    pub date: DateTime<Utc>,
    pub title: String,
}

/// Derives a title from note text: the first non-blank line with inline Markdown removed.
pub fn derive_title(text: &str) -> String {
    let Some(line) = text.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return String::new();
    };

    let mut title = String::new();
    for event in Parser::new(line) {
        match event {
            Event::Text(t) | Event::Code(t) => title.push_str(&t),
            Event::SoftBreak | Event::HardBreak => title.push(' '),
            _ => {}
        }
    }

    let title = title.trim();
    if title.is_empty() {
        // Lines made only of markup (e.g. "---") still deserve a title.
        line.to_string()
    } else {
        title.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "date-desc")]
    DateDescending,
    #[serde(rename = "date-asc")]
    DateAscending,
    #[serde(rename = "title-asc")]
    TitleAscending,
    #[serde(rename = "title-desc")]
    TitleDescending,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::DateDescending,
        SortOrder::DateAscending,
        SortOrder::TitleAscending,
        SortOrder::TitleDescending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::DateDescending => "date-desc",
            SortOrder::DateAscending => "date-asc",
            SortOrder::TitleAscending => "title-asc",
            SortOrder::TitleDescending => "title-desc",
        }
    }

    /// Sorts metadata in place. Ties are broken by id so the order is stable across queries.
    pub fn sort(&self, items: &mut [NoteMetadata]) {
        match self {
            SortOrder::DateDescending => items.sort_by(|a, b| {
                b.date
                    .cmp(&a.date)
                    .then(b.metadata_id.cmp(&a.metadata_id))
            }),
            SortOrder::DateAscending => items.sort_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then(a.metadata_id.cmp(&b.metadata_id))
            }),
            SortOrder::TitleAscending => items.sort_by(|a, b| {
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then(a.metadata_id.cmp(&b.metadata_id))
            }),
            SortOrder::TitleDescending => items.sort_by(|a, b| {
                b.title
                    .to_lowercase()
                    .cmp(&a.title.to_lowercase())
                    .then(b.metadata_id.cmp(&a.metadata_id))
            }),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown sort order '{}' (expected one of: date-desc, date-asc, title-asc, title-desc)",
                    s
                )
            })
    }
}

/// Naming scheme for exported files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilenameFormat {
    #[default]
    #[serde(rename = "title")]
    TitleOnly,
    #[serde(rename = "title-timestamp")]
    TitleAndTimestamp,
    #[serde(rename = "timestamp-title")]
    TimestampAndTitle,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const UNTITLED: &str = "Untitled";

impl FilenameFormat {
    pub const ALL: [FilenameFormat; 3] = [
        FilenameFormat::TitleOnly,
        FilenameFormat::TitleAndTimestamp,
        FilenameFormat::TimestampAndTitle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilenameFormat::TitleOnly => "title",
            FilenameFormat::TitleAndTimestamp => "title-timestamp",
            FilenameFormat::TimestampAndTitle => "timestamp-title",
        }
    }

    /// Builds the export filename for a note. `ext` is appended verbatim (e.g. ".txt").
    pub fn filename(&self, metadata: &NoteMetadata, ext: &str) -> String {
        let title = sanitize_filename(&metadata.title);
        let title = if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title
        };
        let timestamp = metadata.date.format(TIMESTAMP_FORMAT);

        let stem = match self {
            FilenameFormat::TitleOnly => title,
            FilenameFormat::TitleAndTimestamp => format!("{}_{}", title, timestamp),
            FilenameFormat::TimestampAndTitle => format!("{}_{}", timestamp, title),
        };
        format!("{}{}", stem, ext)
    }
}

impl fmt::Display for FilenameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilenameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilenameFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown filename format '{}' (expected one of: title, title-timestamp, timestamp-title)",
                    s
                )
            })
    }
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string()
}
