//! In-memory sink implementations for testing.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::LineDisplay;

/// In-memory line display for testing.
///
/// Clones share the same entries, so a test can keep one clone for
/// inspection while the tee borrows another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDisplay {
    lines: Arc<Mutex<Vec<String>>>,
}

impl InMemoryDisplay {
    /// Create a new empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of the appended entries.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Number of appended entries.
    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the display.
    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl LineDisplay for InMemoryDisplay {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.lock().unwrap().push(line.to_owned());
        Ok(())
    }
}

/// In-memory byte writer for testing.
///
/// Serves both as a stand-in log file and as a stream's original
/// destination. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl InMemoryWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the contents as bytes.
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap().clone()
    }

    /// Get the contents as a string.
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Clear the contents.
    pub fn clear(&self) {
        self.buf.lock().unwrap().clear();
    }
}

impl Write for InMemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self.buf.lock().unwrap();
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
