//! Destinations for rendered log lines.
//!
//! A [`Sink`] receives one complete line per call and is responsible for
//! writing it atomically with respect to other writers sharing the sink.
//! Loggers and their forks hold the sink behind an `Arc` and never lock
//! anything themselves.
//!
//! # Example
//!
//! ```rust
//! use stacklog::sink::{MemorySink, Sink};
//!
//! let sink = MemorySink::new();
//! sink.write_line("first").unwrap();
//! sink.write_line("second").unwrap();
//! assert_eq!(sink.lines(), vec!["first", "second"]);
//! ```

use crate::log_error::{LogError, Result};
use parking_lot::{Mutex, RwLock};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub trait Sink: Send + Sync {
    /// Write `line` followed by a newline as a single unit.
    fn write_line(&self, line: &str) -> Result<()>;

    /// Flush any buffered content.
    fn flush(&self) -> Result<()>;

    /// Description of the destination for error messages.
    fn description(&self) -> String;

    /// Whether this destination is the process's stdout or stderr stream.
    fn is_interactive(&self) -> bool {
        false
    }
}

/// Writes to the process's standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", line).map_err(|e| LogError::sink(self.description(), e))
    }

    fn flush(&self) -> Result<()> {
        io::stdout()
            .lock()
            .flush()
            .map_err(|e| LogError::sink(self.description(), e))
    }

    fn description(&self) -> String {
        "stdout".to_string()
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Writes to the process's standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl StderrSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StderrSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        writeln!(handle, "{}", line).map_err(|e| LogError::sink(self.description(), e))
    }

    fn flush(&self) -> Result<()> {
        io::stderr()
            .lock()
            .flush()
            .map_err(|e| LogError::sink(self.description(), e))
    }

    fn description(&self) -> String {
        "stderr".to_string()
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// In-memory sink, mostly for tests.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<RwLock<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, newlines included.
    pub fn contents(&self) -> String {
        self.buffer.read().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.buffer.read().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.write().clear();
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.buffer.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.read().is_empty()
    }
}

impl Sink for MemorySink {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut buffer = self.buffer.write();
        buffer.push_str(line);
        buffer.push('\n');
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> String {
        "memory".to_string()
    }
}

/// Appends lines to a file, creating it if needed.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogError::sink(format!("file:{}", path.display()), e))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.file
            .lock()
            .write_all(record.as_bytes())
            .map_err(|e| LogError::sink(self.description(), e))
    }

    fn flush(&self) -> Result<()> {
        self.file
            .lock()
            .flush()
            .map_err(|e| LogError::sink(self.description(), e))
    }

    fn description(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Adapts any [`Write`] implementation, serialized behind a mutex.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    label: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_label(writer, "writer")
    }

    pub fn with_label(writer: W, label: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            label: label.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line).map_err(|e| LogError::sink(self.description(), e))
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| LogError::sink(self.description(), e))
    }

    fn description(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_sink_collects_lines() {
        let sink = MemorySink::new();
        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();

        assert_eq!(sink.contents(), "one\ntwo\n");
        assert_eq!(sink.lines(), vec!["one", "two"]);
    }

    #[test]
    fn test_memory_sink_clear() {
        let sink = MemorySink::new();
        sink.write_line("content").unwrap();
        assert!(!sink.is_empty());

        sink.clear();

        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_memory_sink_clones_share_buffer() {
        use std::thread;

        let sink = MemorySink::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = sink.clone();
                thread::spawn(move || {
                    for j in 0..25 {
                        sink.write_line(&format!("t{}-{}", i, j)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 100);
        assert!(lines.iter().all(|l| l.starts_with('t') && l.contains('-')));
    }

    #[test]
    fn test_file_sink_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = FileSink::open(&path).unwrap();
        sink.write_line("first").unwrap();
        sink.flush().unwrap();
        drop(sink);

        let sink = FileSink::open(&path).unwrap();
        sink.write_line("second").unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
        assert!(sink.description().contains("app.log"));
    }

    #[test]
    fn test_file_sink_open_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("app.log");
        assert!(matches!(FileSink::open(&path), Err(LogError::Sink { .. })));
    }

    #[test]
    fn test_writer_sink_into_inner() {
        let sink = WriterSink::new(Vec::new());
        sink.write_line("hello").unwrap();
        assert_eq!(sink.into_inner(), b"hello\n");
    }

    #[test]
    fn test_std_streams_are_interactive() {
        assert!(StdoutSink::new().is_interactive());
        assert!(StderrSink::new().is_interactive());
        assert!(!MemorySink::new().is_interactive());
        assert_eq!(StdoutSink::new().description(), "stdout");
        assert_eq!(StderrSink::new().description(), "stderr");
    }
}
