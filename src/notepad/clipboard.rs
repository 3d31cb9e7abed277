use crate::error::{NotepadError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Copies text to the system clipboard in an OS-specific way.
/// - macOS: uses pbcopy
/// - Linux: uses wl-copy, xclip or xsel
/// - Windows: uses clip.exe
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    if CANDIDATES.is_empty() {
        return Err(NotepadError::Api(
            "Clipboard not supported on this platform".to_string(),
        ));
    }
    pipe_to(CANDIDATES, text)
}

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "linux")]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[];

/// Spawns the first candidate that starts and writes `text` to its stdin.
fn pipe_to(candidates: &[(&str, &[&str])], text: &str) -> Result<()> {
    let mut last_err = None;
    for (program, args) in candidates {
        let mut child = match Command::new(program).args(*args).stdin(Stdio::piped()).spawn() {
            Ok(child) => child,
            Err(e) => {
                last_err = Some(format!("{}: {}", program, e));
                continue;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| NotepadError::Api(format!("Failed to write to {}: {}", program, e)))?;
        }

        let status = child
            .wait()
            .map_err(|e| NotepadError::Api(format!("Failed to wait for {}: {}", program, e)))?;

        return if status.success() {
            Ok(())
        } else {
            Err(NotepadError::Api(format!("{} exited with error", program)))
        };
    }

    Err(NotepadError::Api(format!(
        "No clipboard command available ({})",
        last_err.unwrap_or_default()
    )))
}
