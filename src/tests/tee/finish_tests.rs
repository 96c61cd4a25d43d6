//! Tests for teardown of a tee buffer.

use crate::{InMemoryDisplay, InMemoryWriter, NoopPump, TeeBuffer};

#[test]
fn finish_emits_partial_line_without_trailing_newline() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();

    let mut tee = TeeBuffer::new(&mut log, &mut display, NoopPump);
    tee.write_bytes(b"hello\nworld").unwrap();
    assert_eq!(shown.lines(), ["hello"]);

    tee.finish().unwrap();
    assert_eq!(shown.lines(), ["hello", "world"]);
    assert_eq!(log_view.contents_string(), "hello\nworld");
}

#[test]
fn finish_twice_does_not_reemit() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();

    let mut tee = TeeBuffer::new(&mut log, &mut display, NoopPump);
    tee.write_bytes(b"partial").unwrap();
    tee.finish().unwrap();
    tee.finish().unwrap();
    drop(tee);

    assert_eq!(shown.lines(), ["partial"]);
    assert_eq!(log_view.contents_string(), "partial");
}

#[test]
fn finish_with_nothing_pending_emits_nothing() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();

    let mut tee = TeeBuffer::new(&mut log, &mut display, NoopPump);
    tee.write_bytes(b"done\n").unwrap();
    tee.finish().unwrap();

    assert_eq!(shown.lines(), ["done"]);
    assert_eq!(log_view.contents_string(), "done\n");
}

#[test]
fn drop_emits_leftover() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();

    {
        let mut tee = TeeBuffer::new(&mut log, &mut display, NoopPump);
        tee.write_bytes(b"hello\nworld").unwrap();
    }

    assert_eq!(shown.lines(), ["hello", "world"]);
    assert_eq!(log_view.contents_string(), "hello\nworld");
}
