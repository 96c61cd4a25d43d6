//! Error types for stream tee operations.
//!
//! This module provides:
//! - `Sink`: Indicates which destination failed
//! - `SinkError`: A single sink failure with context
//! - `TeeError`: Everything a tee write or teardown can report

use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// The borrowed log file handle
    LogFile,
    /// The borrowed line display
    Display,
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::LogFile => write!(f, "LogFile"),
            Sink::Display => write!(f, "Display"),
        }
    }
}

#[derive(Debug)]
pub struct SinkError {
    /// Sink that rejected the line
    pub sink: Sink,
    /// Label of the tee that was writing
    pub target: String,
    /// The underlying error
    pub error: io::Error,
}

impl SinkError {
    pub fn new(sink: Sink, target: impl Into<String>, error: io::Error) -> Self {
        Self {
            sink,
            target: target.into(),
            error,
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.sink, self.target, self.error)
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Errors reported by the tee's write and teardown paths.
#[derive(Debug, Error)]
pub enum TeeError {
    /// A log file or display write failed
    #[error(transparent)]
    Sink(#[from] SinkError),
    /// A write reached the tee while it was already handling one,
    /// typically from an event handler run by the event pump.
    #[error("re-entrant write into tee '{target}' while it is emitting a line")]
    Reentrant { target: String },
    /// A write reached the tee after it was finished.
    #[error("write into tee '{target}' after it was finished")]
    Closed { target: String },
}

impl TeeError {
    /// The sink that failed, if this is a sink failure.
    pub fn sink(&self) -> Option<Sink> {
        match self {
            TeeError::Sink(e) => Some(e.sink),
            TeeError::Reentrant { .. } | TeeError::Closed { .. } => None,
        }
    }

    /// Check if this error came from a re-entrant write.
    pub fn is_reentrant(&self) -> bool {
        matches!(self, TeeError::Reentrant { .. })
    }

    /// Check if this error came from a write after teardown.
    pub fn is_closed(&self) -> bool {
        matches!(self, TeeError::Closed { .. })
    }
}

impl From<TeeError> for io::Error {
    fn from(err: TeeError) -> Self {
        let kind = match &err {
            TeeError::Sink(e) => e.error.kind(),
            TeeError::Reentrant { .. } => io::ErrorKind::WouldBlock,
            TeeError::Closed { .. } => io::ErrorKind::NotConnected,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
