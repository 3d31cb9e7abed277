use crate::commands::{count_message, CmdMessage, CmdResult, MSG_EMPTY_NOTE};
use crate::documents::{numbered_name, DocumentSink};
use crate::error::{NotepadError, Result};
use crate::model::{FilenameFormat, Note, NoteMetadata};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::io::Write;

/// Writes one note to the sink. Empty text is skipped with a warning.
pub fn single<K: DocumentSink + ?Sized>(
    sink: &mut K,
    metadata: &NoteMetadata,
    text: &str,
    format: FilenameFormat,
    ext: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if text.is_empty() {
        result.add_message(CmdMessage::warning(MSG_EMPTY_NOTE));
        return Ok(result);
    }

    let filename = format.filename(metadata, ext);
    write_document(sink, &filename, text)?;
    tracing::info!(id = metadata.metadata_id, %filename, "note exported");

    result.add_message(CmdMessage::success(format!(
        "Note exported to {}",
        sink.location()
    )));
    Ok(result)
}

/// Writes every note to the sink in order, reporting once when all writes are done.
pub fn batch<K: DocumentSink + ?Sized>(
    sink: &mut K,
    notes: &[Note],
    format: FilenameFormat,
    ext: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut exported = 0;

    for note in notes {
        if note.text.is_empty() {
            tracing::debug!(id = note.id, "skipping note without saved text");
            continue;
        }
        let filename = format.filename(&note.metadata(), ext);
        write_document(sink, &filename, &note.text)?;
        exported += 1;
    }

    tracing::info!(requested = notes.len(), exported, "batch export finished");
    if exported == 0 {
        result.add_message(CmdMessage::info("No notes to export."));
    } else {
        result.add_message(CmdMessage::success(format!(
            "{} to {}",
            count_message(exported, "Note exported", "notes exported"),
            sink.location()
        )));
    }
    Ok(result)
}

/// Writes the notes as a gzip-compressed tar archive, one entry per note under `notes/`.
pub fn archive<W: Write>(writer: W, notes: &[Note], format: FilenameFormat, ext: &str) -> Result<usize> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);
    let mut written = 0;
    let mut used = HashSet::new();

    for note in notes.iter().filter(|n| !n.text.is_empty()) {
        let filename = unique_entry(&mut used, format.filename(&note.metadata(), ext));
        let entry_name = format!("notes/{}", filename);

        let mut header = tar::Header::new_gnu();
        header.set_size(note.text.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(note.date.timestamp().max(0) as u64);
        header.set_cksum();

        tar.append_data(&mut header, entry_name, note.text.as_bytes())
            .map_err(NotepadError::Io)?;
        written += 1;
    }

    tar.into_inner()
        .and_then(|enc| enc.finish())
        .and_then(|mut inner| inner.flush())
        .map_err(NotepadError::Io)?;
    Ok(written)
}

/// Tar entries may repeat a name; extraction would keep only the last one.
fn unique_entry(used: &mut HashSet<String>, filename: String) -> String {
    if used.insert(filename.clone()) {
        return filename;
    }
    let mut n = 2;
    loop {
        let candidate = numbered_name(&filename, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn write_document<K: DocumentSink + ?Sized>(sink: &mut K, filename: &str, text: &str) -> Result<()> {
    let mut writer = sink.create(filename).map_err(NotepadError::Io)?;
    writer.write_all(text.as_bytes()).map_err(NotepadError::Io)?;
    writer.flush().map_err(NotepadError::Io)?;
    Ok(())
}
