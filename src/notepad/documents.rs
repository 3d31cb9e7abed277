//! # Document Streams
//!
//! Import and export never open files themselves. The host hands in a
//! [`DocumentSource`] per document to read, and a [`DocumentSink`] that creates
//! named output documents. Whatever sits behind them (a file picker, a directory,
//! a buffer in a test) is the host's business.
//!
//! Filesystem-backed implementations are provided for the CLI: [`FileSource`] and
//! [`DirectorySink`]. [`MemorySource`] and [`MemorySink`] keep everything in memory.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// A readable document chosen by the user.
pub trait DocumentSource {
    /// Human readable name used in notifications.
    fn name(&self) -> String;

    /// Opens the document for reading. An error means nothing could be read.
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// A place that can create named output documents.
pub trait DocumentSink {
    /// Where documents end up, for notifications.
    fn location(&self) -> String;

    /// Creates a document called `filename` and returns a writer for it.
    fn create(&mut self, filename: &str) -> io::Result<Box<dyn Write + '_>>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }
}

/// Writes each document as a file inside one directory.
///
/// Existing files are never overwritten: a numbered suffix is added instead,
/// `Note.txt` becoming `Note (2).txt`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths created so far, in creation order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn unique_path(&self, filename: &str) -> PathBuf {
        let candidate = self.dir.join(filename);
        if !candidate.exists() {
            return candidate;
        }

        (2..)
            .map(|n| self.dir.join(numbered_name(filename, n)))
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

/// `Note.txt` with `n = 2` becomes `Note (2).txt`.
pub(crate) fn numbered_name(filename: &str, n: u32) -> String {
    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => filename.split_at(pos),
        _ => (filename, ""),
    };
    format!("{} ({}){}", stem, n, ext)
}

impl DocumentSink for DirectorySink {
    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    fn create(&mut self, filename: &str) -> io::Result<Box<dyn Write + '_>> {
        fs::create_dir_all(&self.dir)?;
        let path = self.unique_path(filename);
        let file = File::create(&path)?;
        self.written.push(path);
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// A document held in memory. `None` content models a source with nothing behind it.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    content: Option<Vec<u8>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
        }
    }

    pub fn unreadable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
        }
    }
}

impl DocumentSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match &self.content {
            Some(bytes) => Ok(Box::new(bytes.as_slice())),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no content behind {}", self.name),
            )),
        }
    }
}

/// Collects created documents in memory, keyed by filename.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, filename: &str) -> Option<&str> {
        self.files
            .get(filename)
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

impl DocumentSink for MemorySink {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn create(&mut self, filename: &str) -> io::Result<Box<dyn Write + '_>> {
        let buf = self.files.entry(filename.to_string()).or_default();
        buf.clear();
        Ok(Box::new(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_directory_sink_never_overwrites() {
        let dir = tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"));

        for body in ["one", "two", "three"] {
            let mut w = sink.create("Note.txt").unwrap();
            w.write_all(body.as_bytes()).unwrap();
        }

        let names: Vec<_> = sink
            .written()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Note.txt", "Note (2).txt", "Note (3).txt"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("out").join("Note (2).txt")).unwrap(),
            "two"
        );
    }

    #[test]
    fn test_file_source_missing_file_fails_to_open() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.txt"));
        assert!(source.open().is_err());
    }

    #[test]
    fn test_memory_sink_collects_text() {
        let mut sink = MemorySink::new();
        sink.create("a.txt").unwrap().write_all(b"hello").unwrap();
        assert_eq!(sink.text("a.txt"), Some("hello"));
    }
}
