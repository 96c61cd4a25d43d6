//! The line-splitting tee buffer.
//!
//! A `TeeBuffer` accumulates written bytes until a newline arrives, then
//! sends the completed line to a borrowed log file and a borrowed line
//! display. `TeeHandle` is the shared, type-erased form that a redirect and
//! its helpers write through.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use tracing::{trace, warn};

use crate::config::{PumpPolicy, TeeConfig};
use crate::error::{Sink, SinkError, TeeError};
use crate::io::{EventPump, LineDisplay};
use crate::stream::StreamBuf;

const NEWLINE: u8 = b'\n';

/// Splits written bytes into lines and forwards each line to a log file and
/// a line display.
///
/// The log file and display are borrowed for `'a`; the caller keeps
/// ownership and closes them. The pending buffer never holds a newline
/// between calls. Any partial line left over is emitted when the buffer is
/// finished or dropped, after which the tee is closed and rejects writes.
pub struct TeeBuffer<'a, W, D, P>
where
    W: Write + ?Sized,
    D: LineDisplay + ?Sized,
    P: EventPump,
{
    label: String,
    pump_policy: PumpPolicy,
    log: &'a mut W,
    display: &'a mut D,
    pump: P,
    pending: Vec<u8>,
    closed: bool,
    // Sink failure swallowed by an `io::Write` call, reported on the next flush.
    deferred: Option<TeeError>,
}

impl<'a, W, D, P> TeeBuffer<'a, W, D, P>
where
    W: Write + ?Sized,
    D: LineDisplay + ?Sized,
    P: EventPump,
{
    /// Create a tee with the default configuration.
    pub fn new(log: &'a mut W, display: &'a mut D, pump: P) -> Self {
        Self::with_config(TeeConfig::default(), log, display, pump)
    }

    pub fn with_config(config: TeeConfig, log: &'a mut W, display: &'a mut D, pump: P) -> Self {
        Self {
            label: config.label,
            pump_policy: config.pump,
            log,
            display,
            pump,
            pending: Vec::new(),
            closed: false,
            deferred: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bytes written since the last completed line.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Check if the tee has been finished.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bulk write.
    ///
    /// Appends `buf` to the pending buffer and emits every completed line,
    /// pumping GUI events after each one unless the policy says otherwise.
    /// The whole block is always consumed: if a sink fails, the remaining
    /// lines are still emitted and the first failure is returned.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, TeeError> {
        self.ensure_open()?;

        // Bytes already pending hold no newline, so only the new block is scanned.
        let mut scan = self.pending.len();
        self.pending.extend_from_slice(buf);

        let mut start = 0;
        let mut first_err = None;
        while let Some(offset) = self.pending[scan..].iter().position(|&b| b == NEWLINE) {
            let end = scan + offset;
            let line = &self.pending[start..end];

            if let Err(e) = emit_line(&mut *self.log, &mut *self.display, &self.label, line, true) {
                first_err.get_or_insert(e);
            }
            if self.pump_policy == PumpPolicy::EveryLine {
                self.pump.process_events();
            }

            start = end + 1;
            scan = start;
        }
        self.pending.drain(..start);

        match first_err {
            Some(e) => Err(e),
            None => Ok(buf.len()),
        }
    }

    /// Single-character write.
    ///
    /// A newline emits the whole pending buffer as one line; any other byte
    /// is appended. Returns the byte it was given.
    pub fn put_char(&mut self, ch: u8) -> Result<u8, TeeError> {
        self.ensure_open()?;

        if ch == NEWLINE {
            let line = std::mem::take(&mut self.pending);
            emit_line(&mut *self.log, &mut *self.display, &self.label, &line, true)?;
        } else {
            self.pending.push(ch);
        }
        Ok(ch)
    }

    /// Flush the log file.
    pub fn flush_log(&mut self) -> Result<(), TeeError> {
        self.log
            .flush()
            .map_err(|e| SinkError::new(Sink::LogFile, &self.label, e).into())
    }

    /// Emit any partial line and close the tee.
    ///
    /// The log file gets the leftover text without a trailing newline. A sink
    /// failure deferred by an earlier `io::Write` call is returned here if
    /// the final emission succeeds. Calling this again does nothing.
    pub fn finish(&mut self) -> Result<(), TeeError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let emitted = if self.pending.is_empty() {
            Ok(())
        } else {
            let line = std::mem::take(&mut self.pending);
            emit_line(&mut *self.log, &mut *self.display, &self.label, &line, false)
        };

        match self.deferred.take() {
            Some(e) if emitted.is_ok() => Err(e),
            _ => emitted,
        }
    }

    /// `io::Write`-style bulk write.
    ///
    /// A sink failure still consumes the block, so it is reported as
    /// `Ok(buf.len())` and the error is held for the next `flush_io` (or
    /// `finish`). Callers that retry on `Err` never duplicate lines.
    pub fn write_io(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.write_bytes(buf) {
            Err(e @ TeeError::Sink(_)) => {
                self.defer(e);
                Ok(buf.len())
            }
            other => Ok(other?),
        }
    }

    /// `io::Write`-style single-character write, with the same deferral as
    /// `write_io`.
    pub fn put_io(&mut self, ch: u8) -> io::Result<u8> {
        match self.put_char(ch) {
            Err(e @ TeeError::Sink(_)) => {
                self.defer(e);
                Ok(ch)
            }
            other => Ok(other?),
        }
    }

    /// Report a deferred sink failure, then flush the log file.
    pub fn flush_io(&mut self) -> io::Result<()> {
        if let Some(e) = self.deferred.take() {
            return Err(e.into());
        }
        Ok(self.flush_log()?)
    }

    fn defer(&mut self, e: TeeError) {
        warn!(label = %self.label, error = %e, "sink failed, reporting on next flush");
        self.deferred.get_or_insert(e);
    }

    fn ensure_open(&self) -> Result<(), TeeError> {
        if self.closed {
            return Err(TeeError::Closed {
                target: self.label.clone(),
            });
        }
        Ok(())
    }
}

fn emit_line<W, D>(
    log: &mut W,
    display: &mut D,
    label: &str,
    line: &[u8],
    terminate: bool,
) -> Result<(), TeeError>
where
    W: Write + ?Sized,
    D: LineDisplay + ?Sized,
{
    let logged =
        write_line(log, line, terminate).map_err(|e| SinkError::new(Sink::LogFile, label, e));
    let shown = display
        .append_line(&String::from_utf8_lossy(line))
        .map_err(|e| SinkError::new(Sink::Display, label, e));

    trace!(label, bytes = line.len(), terminate, "line emitted");

    logged?;
    shown?;
    Ok(())
}

fn write_line<W: Write + ?Sized>(log: &mut W, line: &[u8], terminate: bool) -> io::Result<()> {
    log.write_all(line)?;
    if terminate {
        log.write_all(&[NEWLINE])?;
    }
    log.flush()
}

/// Sink failures do not fail `write`: the block is consumed either way, so
/// the failure is returned by the next `flush` instead.
impl<W, D, P> Write for TeeBuffer<'_, W, D, P>
where
    W: Write + ?Sized,
    D: LineDisplay + ?Sized,
    P: EventPump,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_io(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_io()
    }
}

impl<W, D, P> Drop for TeeBuffer<'_, W, D, P>
where
    W: Write + ?Sized,
    D: LineDisplay + ?Sized,
    P: EventPump,
{
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!(label = %self.label, error = %e, "failed to emit final line on drop");
        }
    }
}

impl<W, D, P> fmt::Debug for TeeBuffer<'_, W, D, P>
where
    W: Write + ?Sized,
    D: LineDisplay + ?Sized,
    P: EventPump,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeeBuffer")
            .field("label", &self.label)
            .field("pump_policy", &self.pump_policy)
            .field("pending", &self.pending.len())
            .field("closed", &self.closed)
            .finish()
    }
}

/// Object-safe view of a `TeeBuffer`, used behind `TeeHandle`.
pub(crate) trait LineTee {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, TeeError>;
    fn put_char(&mut self, ch: u8) -> Result<u8, TeeError>;
    fn write_io(&mut self, buf: &[u8]) -> io::Result<usize>;
    fn put_io(&mut self, ch: u8) -> io::Result<u8>;
    fn flush_io(&mut self) -> io::Result<()>;
    fn finish(&mut self) -> Result<(), TeeError>;
    fn pending_len(&self) -> usize;
    fn is_closed(&self) -> bool;
}

impl<W, D, P> LineTee for TeeBuffer<'_, W, D, P>
where
    W: Write + ?Sized,
    D: LineDisplay + ?Sized,
    P: EventPump,
{
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, TeeError> {
        TeeBuffer::write_bytes(self, buf)
    }

    fn put_char(&mut self, ch: u8) -> Result<u8, TeeError> {
        TeeBuffer::put_char(self, ch)
    }

    fn write_io(&mut self, buf: &[u8]) -> io::Result<usize> {
        TeeBuffer::write_io(self, buf)
    }

    fn put_io(&mut self, ch: u8) -> io::Result<u8> {
        TeeBuffer::put_io(self, ch)
    }

    fn flush_io(&mut self) -> io::Result<()> {
        TeeBuffer::flush_io(self)
    }

    fn finish(&mut self) -> Result<(), TeeError> {
        TeeBuffer::finish(self)
    }

    fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Shared handle to a tee.
///
/// Clones refer to the same buffer. A write that arrives while another write
/// on the same tee is still running (for example from an event handler run
/// by the event pump) fails with `TeeError::Reentrant` instead of touching
/// the pending buffer. Once the tee is finished, every clone fails with
/// `TeeError::Closed`.
#[derive(Clone)]
pub struct TeeHandle<'a> {
    label: Rc<str>,
    inner: Rc<RefCell<dyn LineTee + 'a>>,
}

impl<'a> TeeHandle<'a> {
    pub fn new<W, D, P>(tee: TeeBuffer<'a, W, D, P>) -> Self
    where
        W: Write + ?Sized + 'a,
        D: LineDisplay + ?Sized + 'a,
        P: EventPump + 'a,
    {
        let label: Rc<str> = Rc::from(tee.label());
        let inner: Rc<RefCell<dyn LineTee + 'a>> = Rc::new(RefCell::new(tee));
        Self { label, inner }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of bytes waiting for a newline.
    pub fn pending_len(&self) -> Result<usize, TeeError> {
        Ok(self.borrow()?.pending_len())
    }

    pub fn is_closed(&self) -> Result<bool, TeeError> {
        Ok(self.borrow()?.is_closed())
    }

    pub fn write_bytes(&self, buf: &[u8]) -> Result<usize, TeeError> {
        self.borrow()?.write_bytes(buf)
    }

    pub fn put_char(&self, ch: u8) -> Result<u8, TeeError> {
        self.borrow()?.put_char(ch)
    }

    pub fn finish(&self) -> Result<(), TeeError> {
        self.borrow()?.finish()
    }

    fn borrow(&self) -> Result<RefMut<'_, dyn LineTee + 'a>, TeeError> {
        self.inner.try_borrow_mut().map_err(|_| TeeError::Reentrant {
            target: self.label.to_string(),
        })
    }
}

impl StreamBuf for TeeHandle<'_> {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.borrow()?.write_io(buf)
    }

    fn put_char(&mut self, ch: u8) -> io::Result<u8> {
        self.borrow()?.put_io(ch)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.borrow()?.flush_io()
    }
}

impl Write for TeeHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        StreamBuf::write_bytes(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        StreamBuf::flush(self)
    }
}

impl fmt::Debug for TeeHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeeHandle").field("label", &self.label).finish()
    }
}
