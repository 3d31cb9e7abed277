use crate::error::{NotepadError, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::process::{self, Command};

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(NotepadError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// What came back from an editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The editor exited cleanly.
    Saved(String),
    /// The editor exited with an error (e.g. `:cq` in vim). The buffer is still returned.
    Aborted(String),
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns whether the editor exited successfully.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<bool> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    // $EDITOR may carry arguments ("code --wait")
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(editor.as_str());

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| NotepadError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        tracing::warn!(%editor, ?status, "editor exited with non-zero status");
    }
    Ok(status.success())
}

/// Opens an editor on `initial` and returns the edited note text.
pub fn edit_text(initial: &str, file_extension: &str) -> Result<EditOutcome> {
    let temp_file = env::temp_dir().join(format!("notepad_edit_{}{}", process::id(), file_extension));

    fs::write(&temp_file, initial).map_err(NotepadError::Io)?;
    let edited = open_in_editor(&temp_file)
        .and_then(|ok| Ok((ok, fs::read_to_string(&temp_file).map_err(NotepadError::Io)?)));
    let _ = fs::remove_file(&temp_file);

    let (ok, buffer) = edited?;
    let text = from_buffer(&buffer);
    Ok(if ok {
        EditOutcome::Saved(text)
    } else {
        EditOutcome::Aborted(text)
    })
}

/// Editors append a final newline; notes do not keep trailing whitespace.
pub fn from_buffer(buffer: &str) -> String {
    buffer.trim_end().to_string()
}
