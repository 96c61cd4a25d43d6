//! # streamtee
//!
//! Mirror a diagnostic output stream into a log file and a GUI text display,
//! line by line, without touching the code that writes to the stream.
//!
//! ## Overview
//!
//! streamtee provides:
//! - **Swappable streams**: `OutputStream` forwards writes to a destination that
//!   can be replaced and later restored
//! - **Line tee**: `TeeBuffer` splits bytes into lines and sends each one to a
//!   borrowed log file and a borrowed `LineDisplay`
//! - **Scoped redirection**: `Redirect` installs a tee on a stream and restores
//!   the previous destination when it is finished or dropped
//! - **Cooperative GUI pumping**: an `EventPump` runs after every completed line
//!   so the display keeps repainting during bursts of output
//! - **Error handling**: sink failures, re-entrant writes and writes after
//!   teardown are reported as `TeeError` instead of being silently ignored
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::io::Write;
//! use streamtee::{InMemoryDisplay, NoopPump, OutputStream, Redirect};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stream = OutputStream::stderr();
//!     let mut log = std::fs::File::create("diag.log")?;
//!     let mut display = InMemoryDisplay::new();
//!
//!     {
//!         let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
//!         write!(redirect, "hello\nworld")?;
//!     }
//!     // display: ["hello", "world"], diag.log: "hello\nworld"
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Line semantics
//!
//! - Every completed line is appended to the display without its newline and
//!   written to the log file followed by `"\n"`.
//! - A partial line still pending at teardown is appended to the display and
//!   written to the log file without a trailing newline.
//! - The bulk write path pumps GUI events after each completed line; the
//!   single-character path does not.
//!
//! ## Features
//!
//! - `miette` - Pretty error reporting with miette
//! - `cli` - Builds the `streamtee_demo` binary

pub mod config;
pub mod error;
pub mod io;
pub mod redirect;
pub mod stream;
pub mod tee;

// Re-exports for convenience
pub use config::{PumpPolicy, TeeConfig};
pub use error::{Sink, SinkError, TeeError};
pub use io::{EventPump, FnDisplay, InMemoryDisplay, InMemoryWriter, LineDisplay, NoopPump};
pub use redirect::Redirect;
pub use stream::{OutputStream, StreamBuf, WriterBuf};
pub use tee::{TeeBuffer, TeeHandle};

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::TeeDiagnostic;
