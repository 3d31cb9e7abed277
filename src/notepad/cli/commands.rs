//! # CLI Layer
//!
//! This module is **one possible host shell** for notepad. It is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//! - Installs the tracing subscriber
//!
//! ## Host Lifecycle
//!
//! Every invocation is a short session. Only `edit` takes part in the draft cycle: it
//! resumes (restoring a pending draft), runs the editor, and either saves the result or,
//! when the editor aborts, suspends so the text is kept as a draft for the next `edit`.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `handle_*()`: Per-command handlers that call the API and format output
//! - `print_*()`: Output formatting functions (see `print.rs`)

use super::print::{print_full_note, print_messages, print_notes, print_prefs};
use super::setup::{Cli, Commands};
use clap::Parser;
use notepad::api::NotepadApi;
use notepad::clipboard::copy_to_clipboard;
use notepad::commands::import::expand_paths;
use notepad::commands::CmdMessage;
use notepad::documents::DirectorySink;
use notepad::editor::{edit_text, EditOutcome};
use notepad::error::{NotepadError, Result};
use notepad::init::{data_dir, initialize};
use notepad::model::{FilenameFormat, NoteMetadata, SortOrder, NEW_NOTE_ID};
use notepad::store::sqlite::SqliteStore;
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "NOTEPAD_LOG";

struct AppContext {
    api: NotepadApi<SqliteStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let dir = data_dir()?;
    let mut ctx = AppContext {
        api: initialize(&dir)?.api,
    };

    match cli.command {
        Some(Commands::New { text }) => handle_new(&mut ctx, text),
        Some(Commands::List { sort }) => handle_list(&mut ctx, sort),
        Some(Commands::Search { term }) => handle_search(&mut ctx, term),
        Some(Commands::View { id }) => handle_view(&mut ctx, id),
        Some(Commands::Edit { id }) => handle_edit(&mut ctx, id),
        Some(Commands::Delete { ids }) => handle_delete(&mut ctx, ids),
        Some(Commands::Share { id }) => handle_share(&mut ctx, id),
        Some(Commands::Print { id }) => handle_print(&mut ctx, id),
        Some(Commands::Import { paths }) => handle_import(&mut ctx, paths),
        Some(Commands::Export {
            ids,
            dir,
            format,
            archive,
        }) => handle_export(&mut ctx, ids, dir, format, archive),
        Some(Commands::Prefs { key, value }) => handle_prefs(&mut ctx, key, value),
        Some(Commands::Login { name }) => handle_login(&mut ctx, name),
        Some(Commands::Logout) => handle_logout(&mut ctx),
        Some(Commands::Whoami) => handle_whoami(&ctx),
        None => handle_list(&mut ctx, None),
    }
}

/// Logs go to stderr so stdout stays clean for piping.
fn init_tracing(verbose: bool) {
    let default = if verbose { "notepad=info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn handle_new(ctx: &mut AppContext, words: Vec<String>) -> Result<()> {
    ctx.api.add_button_click();

    let mut text = words.join(" ");
    if text.is_empty() && !std::io::stdin().is_terminal() {
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(NotepadError::Io)?;
        text = text.trim_end().to_string();
    }

    if text.is_empty() {
        ctx.api.clear_note();
        return edit_session(ctx);
    }

    let result = ctx.api.save_note(NEW_NOTE_ID, &text)?;
    print_messages(&result.messages);
    if let Some(note) = result.affected_notes.first() {
        println!("Created note {}", note.id);
    }
    Ok(())
}

fn handle_list(ctx: &mut AppContext, sort: Option<SortOrder>) -> Result<()> {
    if let Some(sort) = sort {
        ctx.api.prefs().update(|p| p.sort_order = sort)?;
    }

    let prefs = ctx.api.prefs().get();
    if !prefs.first_run_complete {
        print_messages(&[CmdMessage::info(
            "Welcome! Create a note with `notepad new`, edit it with `notepad edit <id>`.",
        )]);
        ctx.api.first_run_complete()?;
    }

    let result = ctx.api.list_notes()?;
    print_notes(&result.listed_notes);
    print_messages(&result.messages);

    if !prefs.first_view_complete && !result.listed_notes.is_empty() {
        ctx.api.first_view_complete()?;
    }
    Ok(())
}

fn handle_search(ctx: &mut AppContext, term: Vec<String>) -> Result<()> {
    let result = ctx.api.search(&term.join(" "))?;
    print_notes(&result.listed_notes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, id: i64) -> Result<()> {
    let result = ctx.api.view_note(id)?;
    for note in &result.affected_notes {
        print_full_note(note);
    }
    print_messages(&result.messages);
    Ok(())
}

/// `edit` without an id resumes a pending draft, or starts a new note when there is none.
fn handle_edit(ctx: &mut AppContext, id: Option<i64>) -> Result<()> {
    if let Some(id) = id {
        let found = ctx.api.view_note(id)?;
        if found.affected_notes.is_empty() {
            print_messages(&found.messages);
            return Ok(());
        }
    }

    let draft_id = ctx.api.saved_draft_id()?;
    ctx.api.set_is_editing(true);

    match (id, draft_id) {
        (Some(id), Some(other)) if other != id => {
            print_messages(&[CmdMessage::warning(format!(
                "Note {} has an unsaved draft; run `notepad edit {}` to resume it",
                other, other
            ))]);
            ctx.api.get_note(Some(id))?;
        }
        (_, Some(_)) => {
            let resumed = ctx.api.on_resume()?;
            print_messages(&resumed.messages);
        }
        (Some(id), None) => ctx.api.get_note(Some(id))?,
        (None, None) => ctx.api.clear_note(),
    }

    edit_session(ctx)
}

fn edit_session(ctx: &mut AppContext) -> Result<()> {
    ctx.api.set_is_editing(true);
    let ext = ctx.api.config().export_ext().to_string();

    match edit_text(ctx.api.text(), &ext)? {
        EditOutcome::Saved(text) => {
            ctx.api.set_text(text.clone());
            let id = ctx.api.note_state().id;
            let result = if text.is_empty() && id != NEW_NOTE_ID {
                ctx.api.delete_note(id)?
            } else {
                ctx.api.save_current_note()?
            };
            ctx.api.set_is_editing(false);
            print_messages(&result.messages);
        }
        EditOutcome::Aborted(text) => {
            ctx.api.set_text(text);
            let result = ctx.api.on_suspend()?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, ids: Vec<i64>) -> Result<()> {
    for id in ids {
        if !ctx.api.is_selected(id) {
            ctx.api.toggle_selected_note(id);
        }
    }
    let result = ctx.api.delete_selected_notes()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_share(ctx: &mut AppContext, id: i64) -> Result<()> {
    let found = ctx.api.view_note(id)?;
    let Some(note) = found.affected_notes.first() else {
        print_messages(&found.messages);
        return Ok(());
    };

    let result = ctx.api.share_note(note.id, &note.text);
    print_messages(&result.messages);
    if let Some(text) = &result.shared_text {
        copy_to_clipboard(text)?;
        print_messages(&[CmdMessage::success("Copied to clipboard")]);
    }
    Ok(())
}

fn handle_print(ctx: &mut AppContext, id: i64) -> Result<()> {
    let result = ctx.api.print_note(id)?;
    for note in &result.affected_notes {
        println!("{}", note.text);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, paths: Vec<PathBuf>) -> Result<()> {
    let (sources, messages) = expand_paths(&paths, &ctx.api.config().import_extensions)?;
    print_messages(&messages);

    let result = ctx.api.import_notes(&sources)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(
    ctx: &mut AppContext,
    ids: Vec<i64>,
    dir: PathBuf,
    format: Option<FilenameFormat>,
    archive: Option<PathBuf>,
) -> Result<()> {
    if let Some(format) = format {
        ctx.api.prefs().update(|p| p.filename_format = format)?;
    }

    let listing = ctx.api.list_notes()?.listed_notes;
    let chosen: Vec<NoteMetadata> = if ids.is_empty() {
        listing.clone()
    } else {
        listing
            .iter()
            .filter(|m| ids.contains(&m.metadata_id))
            .cloned()
            .collect()
    };
    ctx.api.select_all_notes(&chosen);

    let result = match archive {
        Some(path) => {
            let file = File::create(&path).map_err(NotepadError::Io)?;
            let mut result = ctx.api.export_archive(&listing, BufWriter::new(file))?;
            result.add_message(CmdMessage::info(format!(
                "Archive written to {}",
                path.display()
            )));
            result
        }
        None => {
            let mut sink = DirectorySink::new(dir);
            ctx.api.export_notes(&listing, &mut sink)?
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_prefs(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => print_prefs(&ctx.api.prefs().get()),
        (Some(key), None) => print_messages(&ctx.api.get_preference(&key)?.messages),
        (Some(key), Some(value)) => print_messages(&ctx.api.set_preference(&key, &value)?.messages),
    }
    Ok(())
}

fn handle_login(ctx: &mut AppContext, name: Vec<String>) -> Result<()> {
    let result = ctx.api.login(&name.join(" "))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_logout(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.logout()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    let name = ctx.api.user_name();
    if name.is_empty() {
        println!("Not logged in");
    } else {
        println!("{}", name);
    }
    Ok(())
}
