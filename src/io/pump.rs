//! Event pump trait definition.

/// The GUI application's "process pending events" operation.
///
/// The tee calls this after each completed line on the bulk write path so
/// the display can repaint during bursts of output.
pub trait EventPump {
    fn process_events(&mut self);
}

impl<F> EventPump for F
where
    F: FnMut(),
{
    fn process_events(&mut self) {
        self()
    }
}

/// Event pump that does nothing, for hosts without an event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPump;

impl EventPump for NoopPump {
    fn process_events(&mut self) {}
}
