//! Sink abstractions for the tee.
//!
//! This module provides:
//! - `LineDisplay`: Trait for GUI text displays that accept whole lines
//! - `EventPump`: Trait for the GUI application's "process pending events" hook
//! - In-memory implementations for testing

mod display;
mod memory;
mod pump;

pub use display::{FnDisplay, LineDisplay};
pub use memory::{InMemoryDisplay, InMemoryWriter};
pub use pump::{EventPump, NoopPump};
