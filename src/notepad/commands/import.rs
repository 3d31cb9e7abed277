use crate::commands::{count_message, save, CmdMessage, CmdResult};
use crate::documents::{DocumentSource, FileSource};
use crate::error::{NotepadError, Result};
use crate::model::NEW_NOTE_ID;
use crate::store::NoteStore;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Imports each source as a new note.
///
/// Empty documents are skipped silently. Documents that cannot be opened or are not
/// valid UTF-8 are skipped with a warning. Storage errors abort the import.
pub fn run<S: NoteStore, D: DocumentSource>(store: &mut S, sources: &[D]) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for source in sources {
        let text = match read_text(source) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(source = %source.name(), error = %e, "skipping unreadable document");
                result.add_message(CmdMessage::warning(format!(
                    "Failed to import: {}",
                    source.name()
                )));
                continue;
            }
        };

        if text.is_empty() {
            tracing::debug!(source = %source.name(), "skipping empty document");
            continue;
        }

        let id = save::run(store, NEW_NOTE_ID, &text, None, "")?;
        if let Some(note) = store.get_note(id)? {
            result.affected_notes.push(note);
        }
    }

    let imported = result.affected_notes.len();
    tracing::info!(requested = sources.len(), imported, "import finished");
    if imported == 0 {
        result.add_message(CmdMessage::info("No notes imported."));
    } else {
        result.add_message(CmdMessage::success(count_message(
            imported,
            "Note imported successfully",
            "notes imported successfully",
        )));
    }
    Ok(result)
}

/// Reads a single document. Nothing readable behind it yields `None`, not an error.
pub fn load<D: DocumentSource + ?Sized>(source: &D) -> Option<String> {
    match read_text(source) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!(source = %source.name(), error = %e, "nothing loaded");
            None
        }
    }
}

fn read_text<D: DocumentSource + ?Sized>(source: &D) -> io::Result<String> {
    let mut reader = source.open()?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Expands user supplied paths into file sources.
///
/// Files are taken as given. Directories contribute their direct children whose
/// extension is listed in `import_exts` (e.g. ".txt"). Missing paths produce a warning.
pub fn expand_paths(paths: &[PathBuf], import_exts: &[String]) -> Result<(Vec<FileSource>, Vec<CmdMessage>)> {
    let mut sources = Vec::new();
    let mut messages = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut children: Vec<PathBuf> = fs::read_dir(path)
                .map_err(NotepadError::Io)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .filter(|p| {
                    p.extension()
                        .map(|ext| import_exts.contains(&format!(".{}", ext.to_string_lossy())))
                        .unwrap_or(false)
                })
                .collect();
            children.sort();
            sources.extend(children.into_iter().map(FileSource::new));
        } else if path.is_file() {
            sources.push(FileSource::new(path.clone()));
        } else {
            messages.push(CmdMessage::warning(format!(
                "Path not found: {}",
                path.display()
            )));
        }
    }

    Ok((sources, messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::MemorySource;
    use crate::model::SortOrder;
    use crate::store::memory::InMemoryStore;
    use tempfile::tempdir;

    #[test]
    fn imports_non_empty_documents() {
        let mut store = InMemoryStore::new();
        let sources = [
            MemorySource::new("a.txt", "Alpha\nfirst"),
            MemorySource::new("empty.txt", ""),
            MemorySource::new("b.txt", "Beta"),
        ];

        let result = run(&mut store, &sources).unwrap();
        assert_eq!(result.affected_notes.len(), 2);
        assert!(result.has_message("2 notes imported successfully"));
        assert_eq!(store.list_metadata(SortOrder::TitleAscending).unwrap().len(), 2);
    }

    #[test]
    fn empty_document_creates_nothing() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, &[MemorySource::new("empty.txt", "")]).unwrap();
        assert!(store.is_empty());
        assert!(result.has_message("No notes imported."));
    }

    #[test]
    fn stored_text_is_decoded_utf8() {
        let mut store = InMemoryStore::new();
        let bytes = "Café ☕\nligne deux".as_bytes().to_vec();
        let result = run(&mut store, &[MemorySource::new("c.txt", bytes)]).unwrap();

        assert!(result.has_message("Note imported successfully"));
        let id = result.affected_notes[0].id;
        assert_eq!(store.get_note(id).unwrap().unwrap().text, "Café ☕\nligne deux");
    }

    #[test]
    fn unreadable_and_invalid_documents_are_skipped() {
        let mut store = InMemoryStore::new();
        let sources = [
            MemorySource::unreadable("gone.txt"),
            MemorySource::new("bin.dat", vec![0xff, 0xfe, 0x00]),
            MemorySource::new("ok.txt", "fine"),
        ];

        let result = run(&mut store, &sources).unwrap();
        assert_eq!(store.len(), 1);
        assert!(result.has_message("Failed to import: gone.txt"));
        assert!(result.has_message("Failed to import: bin.dat"));
    }

    #[test]
    fn load_yields_none_when_nothing_is_behind_the_source() {
        assert_eq!(load(&MemorySource::unreadable("x")), None);
        assert_eq!(load(&MemorySource::new("y", "text")), Some("text".to_string()));
    }

    #[test]
    fn expand_paths_filters_directory_children() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("c.png"), "c").unwrap();
        let missing = dir.path().join("nope.txt");

        let (sources, messages) = expand_paths(
            &[dir.path().to_path_buf(), missing],
            &[".txt".to_string(), ".md".to_string()],
        )
        .unwrap();

        let names: Vec<_> = sources
            .iter()
            .map(|s| s.path().file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.md", "b.txt"]);
        assert_eq!(messages.len(), 1);
    }
}
