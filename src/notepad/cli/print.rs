use chrono::{DateTime, Utc};
use colored::Colorize;
use notepad::api::MessageLevel;
use notepad::commands::CmdMessage;
use notepad::model::{Note, NoteMetadata};
use notepad::prefs::Prefs;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_notes(notes: &[NoteMetadata]) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    let line_width = line_width();
    let idx_width = notes
        .iter()
        .map(|m| format!("{}. ", m.metadata_id).width())
        .max()
        .unwrap_or(0);

    for m in notes {
        let idx_str = format!("{:>width$}", format!("{}. ", m.metadata_id), width = idx_width);
        let available = line_width.saturating_sub(2 + idx_width + TIME_WIDTH);

        let title = if m.title.is_empty() {
            "Untitled".italic().to_string()
        } else {
            truncate_to_width(&m.title, available)
        };
        let padding = available.saturating_sub(visible_width(&m.title, &title, available));

        println!(
            "  {}{}{}{}",
            idx_str.yellow(),
            title,
            " ".repeat(padding),
            format_time_ago(m.date).dimmed()
        );
    }
}

pub(super) fn print_full_note(note: &Note) {
    let title = note.title();
    println!("{} {}", format!("{}.", note.id).yellow(), title.bold());
    println!("{}", "-".repeat(title.width().max(8).min(line_width())).dimmed());
    println!("{}", note.text);
    if note.has_draft() {
        println!();
        println!("{}", "Unsaved draft (run `notepad edit` to resume it)".yellow());
    }
}

pub(super) fn print_prefs(prefs: &Prefs) {
    let Ok(serde_json::Value::Object(map)) = serde_json::to_value(prefs) else {
        return;
    };
    let key_width = map.keys().map(|k| k.width()).max().unwrap_or(0);
    for (key, value) in map {
        println!("{}  {}", format!("{:<width$}", key, width = key_width).bold(), value);
    }
}

/// Width of the terminal, capped so lines stay readable on wide screens.
fn line_width() -> usize {
    let (_, cols) = console::Term::stdout().size();
    match cols as usize {
        0 => LINE_WIDTH,
        cols => cols.min(LINE_WIDTH),
    }
}

fn visible_width(raw: &str, shown: &str, available: usize) -> usize {
    if raw.is_empty() {
        "Untitled".width()
    } else {
        shown.width().min(available)
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
