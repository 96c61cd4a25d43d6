//! Output streams with a swappable destination.

use std::fmt;
use std::io::{self, Write};

/// Destination of an `OutputStream`.
///
/// Mirrors the two entry points a stream uses: a bulk write for blocks of
/// text and a single-character write.
pub trait StreamBuf {
    /// Write a block of bytes, returning how many were accepted.
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Write one byte, returning it on success.
    fn put_char(&mut self, ch: u8) -> io::Result<u8> {
        match self.write_bytes(&[ch])? {
            0 => Err(io::Error::from(io::ErrorKind::WriteZero)),
            _ => Ok(ch),
        }
    }

    /// Flush anything buffered by the destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapts any `io::Write` into a stream destination.
#[derive(Debug)]
pub struct WriterBuf<W> {
    inner: W,
}

impl<W: Write> WriterBuf<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> StreamBuf for WriterBuf<W> {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn put_char(&mut self, ch: u8) -> io::Result<u8> {
        self.inner.write_all(&[ch])?;
        Ok(ch)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A named output stream whose destination can be swapped out.
///
/// Code that produces diagnostics writes to the stream; whoever owns the
/// stream decides where the bytes go. Every destination installed over the
/// stream's life must outlive `'a`.
pub struct OutputStream<'a> {
    id: String,
    dest: Box<dyn StreamBuf + 'a>,
}

impl<'a> OutputStream<'a> {
    /// Create a stream writing to `dest`.
    pub fn new(id: impl Into<String>, dest: impl Write + 'a) -> Self {
        Self::with_buf(id, Box::new(WriterBuf::new(dest)))
    }

    /// Create a stream over an existing destination.
    pub fn with_buf(id: impl Into<String>, dest: Box<dyn StreamBuf + 'a>) -> Self {
        Self {
            id: id.into(),
            dest,
        }
    }

    /// Stream over the process's stdout.
    pub fn stdout() -> Self {
        Self::new("-", io::stdout())
    }

    /// Stream over the process's stderr.
    pub fn stderr() -> Self {
        Self::new("stderr", io::stderr())
    }

    /// Returns the stream's identifier.
    ///
    /// Convention: "-" for stdout, "stderr" for stderr.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Write a single byte through the destination's single-character path.
    pub fn put(&mut self, ch: u8) -> io::Result<u8> {
        self.dest.put_char(ch)
    }

    /// Install `dest` and hand back the destination it replaces.
    pub fn replace_destination(&mut self, dest: Box<dyn StreamBuf + 'a>) -> Box<dyn StreamBuf + 'a> {
        std::mem::replace(&mut self.dest, dest)
    }
}

impl Write for OutputStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.dest.write_bytes(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.dest.flush()
    }
}

impl fmt::Debug for OutputStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputStream").field("id", &self.id).finish()
    }
}
