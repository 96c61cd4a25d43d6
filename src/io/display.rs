//! Line display trait definition.

use std::io;

/// Trait for text displays that receive one entry per completed line.
///
/// This is the "append a line" operation of a scrollable log widget. The
/// line never contains the terminating newline.
pub trait LineDisplay {
    /// Append one line of text as a new entry.
    fn append_line(&mut self, line: &str) -> io::Result<()>;
}

impl LineDisplay for Vec<String> {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_owned());
        Ok(())
    }
}

impl<D: LineDisplay + ?Sized> LineDisplay for Box<D> {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        (**self).append_line(line)
    }
}

/// Adapts a closure into a `LineDisplay`.
///
/// Useful for widget toolkits whose append call cannot fail.
pub struct FnDisplay<F> {
    f: F,
}

impl<F> FnDisplay<F>
where
    F: FnMut(&str),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> LineDisplay for FnDisplay<F>
where
    F: FnMut(&str),
{
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        (self.f)(line);
        Ok(())
    }
}

impl<F> std::fmt::Debug for FnDisplay<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnDisplay").finish()
    }
}
