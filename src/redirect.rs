//! Scoped redirection of an output stream into a tee.

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, warn};

use crate::config::TeeConfig;
use crate::error::TeeError;
use crate::io::{EventPump, LineDisplay};
use crate::stream::{OutputStream, StreamBuf};
use crate::tee::{TeeBuffer, TeeHandle};

/// Guard that keeps a stream redirected into a tee.
///
/// While the guard is alive, everything written through it is split into
/// lines for the log file and display, and the stream's previous destination
/// receives nothing. Finishing the guard, explicitly or by dropping it, emits
/// any partial line and puts the previous destination back. Both happen at
/// most once.
///
/// The log file and display are borrowed for `'t` only, which may be shorter
/// than the lifetime of the stream's own destinations: once the guard is gone
/// they can be read or dropped while the stream lives on.
///
/// ```rust,ignore
/// let mut stream = OutputStream::stderr();
/// {
///     let mut log = File::create("diag.log")?;
///     let mut display = InMemoryDisplay::new();
///     let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
///     writeln!(redirect, "loaded {} assets", 12)?;
///     redirect.finish()?;
/// }
/// writeln!(stream, "back on stderr")?;
/// ```
pub struct Redirect<'s, 'a, 't> {
    stream: &'s mut OutputStream<'a>,
    tee: TeeHandle<'t>,
    original: Option<Box<dyn StreamBuf + 'a>>,
}

impl<'s, 'a, 't> Redirect<'s, 'a, 't> {
    /// Redirect `stream` into a new tee labelled with the stream's id.
    pub fn install<W, D, P>(
        stream: &'s mut OutputStream<'a>,
        log: &'t mut W,
        display: &'t mut D,
        pump: P,
    ) -> Self
    where
        W: Write + ?Sized + 't,
        D: LineDisplay + ?Sized + 't,
        P: EventPump + 't,
    {
        let config = TeeConfig::new(stream.id());
        Self::install_with(config, stream, log, display, pump)
    }

    /// Redirect `stream` into a new tee built from `config`.
    pub fn install_with<W, D, P>(
        config: TeeConfig,
        stream: &'s mut OutputStream<'a>,
        log: &'t mut W,
        display: &'t mut D,
        pump: P,
    ) -> Self
    where
        W: Write + ?Sized + 't,
        D: LineDisplay + ?Sized + 't,
        P: EventPump + 't,
    {
        Self::from_buffer(stream, TeeBuffer::with_config(config, log, display, pump))
    }

    /// Redirect `stream` into an existing tee buffer.
    pub fn from_buffer<W, D, P>(stream: &'s mut OutputStream<'a>, tee: TeeBuffer<'t, W, D, P>) -> Self
    where
        W: Write + ?Sized + 't,
        D: LineDisplay + ?Sized + 't,
        P: EventPump + 't,
    {
        let tee = TeeHandle::new(tee);
        let original = stream.replace_destination(Box::new(Detached));
        debug!(stream = stream.id(), label = tee.label(), "stream redirected into tee");

        Self {
            stream,
            tee,
            original: Some(original),
        }
    }

    /// A shared handle to the tee, for writers that cannot borrow the guard.
    ///
    /// Writes through the handle fail with `TeeError::Closed` once the guard
    /// is finished.
    pub fn handle(&self) -> TeeHandle<'t> {
        self.tee.clone()
    }

    /// Check if the stream is still redirected.
    pub fn is_active(&self) -> bool {
        self.original.is_some()
    }

    /// Write a single byte to the stream.
    pub fn put(&mut self, ch: u8) -> io::Result<u8> {
        if self.is_active() {
            StreamBuf::put_char(&mut self.tee, ch)
        } else {
            self.stream.put(ch)
        }
    }

    /// Emit any partial line and restore the stream's previous destination.
    ///
    /// The destination is restored even when emitting the partial line
    /// fails. Later calls return `Ok(())` without doing anything.
    pub fn finish(&mut self) -> Result<(), TeeError> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };

        let flushed = self.tee.finish();
        drop(self.stream.replace_destination(original));
        debug!(stream = self.stream.id(), label = self.tee.label(), "stream destination restored");

        flushed
    }
}

/// Writes go to the tee while redirected and to the restored destination
/// after `finish`.
impl Write for Redirect<'_, '_, '_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.is_active() {
            StreamBuf::write_bytes(&mut self.tee, buf)
        } else {
            self.stream.write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.is_active() {
            StreamBuf::flush(&mut self.tee)
        } else {
            self.stream.flush()
        }
    }
}

impl Drop for Redirect<'_, '_, '_> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!(stream = self.stream.id(), error = %e, "failed to emit final line while restoring stream");
        }
    }
}

impl fmt::Debug for Redirect<'_, '_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Redirect")
            .field("stream", &self.stream.id())
            .field("label", &self.tee.label())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Placeholder destination held by a redirected stream.
///
/// The guard borrows the stream exclusively, so nothing reaches this while
/// the redirect is active.
struct Detached;

impl StreamBuf for Detached {
    fn write_bytes(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::NotConnected, "stream is redirected"))
    }
}
