//! # Notepad Architecture
//!
//! Notepad is a **UI-agnostic note-taking library**. The binary in this crate is one host
//! shell for it; a GUI or a mobile front end would be another. Nothing from `api.rs`
//! inward knows which one is calling.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns session state: editor slots, selection, prefs       │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, draft.rs)                    │
//! │  - Pure business logic                                      │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract NoteStore trait                                 │
//! │  - SqliteStore (production), InMemoryStore (testing)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Host Lifecycle
//!
//! A host tells the library when it goes away and comes back
//! ([`api::NotepadApi::on_suspend`], [`api::NotepadApi::on_resume`]). Unsaved editor
//! text is written as a draft on suspend and offered back once on the next resume.
//! See [`draft`].
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//! - Reads and writes user documents only through [`documents`] traits
//!
//! Notifications meant for the user are [`commands::CmdMessage`]s, not prints.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`, `draft.rs`): unit tests of business logic over
//!    the in-memory store. This is where most testing lives.
//! 2. **API** (`api.rs`): dispatch, selection handling and event recording.
//! 3. **CLI** (`tests/`): end-to-end runs of the binary against a temporary home.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`draft`]: Editor slots and the suspend/resume draft cycle
//! - [`selection`]: Multi-select state for bulk actions
//! - [`feed`]: Listings that follow store and sort-order changes
//! - [`prefs`]: Observable user preferences
//! - [`events`]: Event records and the event counter
//! - [`documents`]: Document source/sink abstractions for import and export
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Note`, `NoteMetadata`, `SortOrder`)
//! - [`config`]: Host configuration
//! - [`init`]: Wiring for the default on-disk setup
//! - [`editor`]: External editor integration
//! - [`clipboard`]: Cross-platform clipboard support
//! - [`error`]: Error types

pub mod api;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod documents;
pub mod draft;
pub mod editor;
pub mod error;
pub mod events;
pub mod feed;
pub mod init;
pub mod model;
pub mod prefs;
pub mod selection;
pub mod store;
