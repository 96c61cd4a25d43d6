//! Tests for installing and restoring a redirection.

use std::cell::Cell;
use std::io::{ErrorKind, Write};

use crate::tests::support::FailingWriter;
use crate::{
    InMemoryDisplay, InMemoryWriter, NoopPump, OutputStream, PumpPolicy, Redirect, Sink,
    TeeConfig, TeeError,
};

#[test]
fn redirect_tees_lines_and_restores_on_drop() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let console = InMemoryWriter::new();
    let mut stream = OutputStream::new("stderr", console.clone());

    {
        let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
        assert!(redirect.is_active());
        redirect.write_all(b"hello\nworld").unwrap();
        assert_eq!(shown.lines(), ["hello"]);
    }

    assert_eq!(shown.lines(), ["hello", "world"]);
    assert_eq!(log_view.contents_string(), "hello\nworld");
    assert!(console.contents().is_empty());

    stream.write_all(b"after\n").unwrap();
    assert_eq!(console.contents_string(), "after\n");
    assert_eq!(shown.len(), 2);
    assert_eq!(log_view.contents_string(), "hello\nworld");
}

#[test]
fn formatted_writes_reach_the_tee() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let console = InMemoryWriter::new();
    let mut stream = OutputStream::new("stderr", console.clone());

    let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
    writeln!(redirect, "frame {} took {}ms", 3, 16).unwrap();
    redirect.finish().unwrap();

    assert_eq!(shown.lines(), ["frame 3 took 16ms"]);
    assert_eq!(log_view.contents_string(), "frame 3 took 16ms\n");
    assert!(console.contents().is_empty());
}

#[test]
fn put_uses_the_single_character_path() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let mut stream = OutputStream::new("stderr", InMemoryWriter::new());

    {
        let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
        assert_eq!(redirect.put(b'a').unwrap(), b'a');
        redirect.put(b'b').unwrap();
        redirect.put(b'\n').unwrap();
    }

    assert_eq!(shown.lines(), ["ab"]);
    assert_eq!(log_view.contents_string(), "ab\n");
}

#[test]
fn finish_is_idempotent_and_restores_once() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let console = InMemoryWriter::new();
    let mut stream = OutputStream::new("stderr", console.clone());

    let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
    redirect.write_all(b"tail").unwrap();
    redirect.finish().unwrap();
    redirect.finish().unwrap();
    assert!(!redirect.is_active());

    // After finishing, the guard writes to the restored destination.
    redirect.write_all(b"late\n").unwrap();
    drop(redirect);

    assert_eq!(shown.lines(), ["tail"]);
    assert_eq!(log_view.contents_string(), "tail");
    assert_eq!(console.contents_string(), "late\n");
}

#[test]
fn finish_restores_even_when_the_log_fails() {
    let mut log = FailingWriter;
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let console = InMemoryWriter::new();
    let mut stream = OutputStream::new("stderr", console.clone());

    let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
    redirect.write_all(b"partial").unwrap();
    let err = redirect.finish().unwrap_err();
    assert_eq!(err.sink(), Some(Sink::LogFile));
    assert!(!redirect.is_active());
    drop(redirect);

    stream.write_all(b"x\n").unwrap();
    assert_eq!(shown.lines(), ["partial"]);
    assert_eq!(console.contents_string(), "x\n");
}

#[test]
fn tee_is_labelled_with_the_stream_id() {
    let mut log = InMemoryWriter::new();
    let mut display = InMemoryDisplay::new();
    let mut stream = OutputStream::new("stderr", InMemoryWriter::new());

    let redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
    assert_eq!(redirect.handle().label(), "stderr");
}

#[test]
fn install_with_applies_the_config() {
    let pumps = Cell::new(0);
    let mut log = InMemoryWriter::new();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let mut stream = OutputStream::new("stderr", InMemoryWriter::new());

    {
        let config = TeeConfig::new("diag").with_pump(PumpPolicy::Never);
        let mut redirect =
            Redirect::install_with(config, &mut stream, &mut log, &mut display, || {
                pumps.set(pumps.get() + 1)
            });
        assert_eq!(redirect.handle().label(), "diag");
        redirect.write_all(b"one\ntwo\n").unwrap();
    }

    assert_eq!(pumps.get(), 0);
    assert_eq!(shown.lines(), ["one", "two"]);
}

#[test]
fn handle_writes_share_the_pending_buffer() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let mut stream = OutputStream::new("stderr", InMemoryWriter::new());

    {
        let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
        let mut handle = redirect.handle();
        redirect.write_all(b"from stream, ").unwrap();
        handle.write_all(b"from handle\n").unwrap();
        assert_eq!(handle.pending_len().unwrap(), 0);
    }

    assert_eq!(shown.lines(), ["from stream, from handle"]);
    assert_eq!(log_view.contents_string(), "from stream, from handle\n");
}

#[test]
fn handles_are_closed_once_the_redirect_finishes() {
    let mut log = InMemoryWriter::new();
    let log_view = log.clone();
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let console = InMemoryWriter::new();
    let mut stream = OutputStream::new("stderr", console.clone());

    let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
    redirect.write_all(b"tail").unwrap();
    let mut handle = redirect.handle();
    redirect.finish().unwrap();

    let err = handle.write_all(b"after teardown\nleft").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
    assert!(matches!(
        handle.write_bytes(b"more\n"),
        Err(TeeError::Closed { ref target }) if target == "stderr"
    ));
    assert!(handle.put_char(b'x').unwrap_err().is_closed());
    assert!(handle.is_closed().unwrap());

    drop(handle);
    drop(redirect);

    assert_eq!(shown.lines(), ["tail"]);
    assert_eq!(log_view.contents_string(), "tail");
    assert!(console.contents().is_empty());
}

#[test]
fn log_and_display_can_be_shorter_lived_than_the_stream() {
    let console = InMemoryWriter::new();
    let mut stream = OutputStream::new("stderr", console.clone());

    {
        let mut log: Vec<u8> = Vec::new();
        let mut display: Vec<String> = Vec::new();
        {
            let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
            writeln!(redirect, "x").unwrap();
        }
        assert_eq!(display, ["x"]);
        assert_eq!(log, b"x\n");
    }

    writeln!(stream, "after").unwrap();
    assert_eq!(console.contents_string(), "after\n");
}

#[test]
fn guard_write_reports_sink_failures_on_flush() {
    let mut log = FailingWriter;
    let mut display = InMemoryDisplay::new();
    let shown = display.clone();
    let mut stream = OutputStream::new("stderr", InMemoryWriter::new());

    let mut redirect = Redirect::install(&mut stream, &mut log, &mut display, NoopPump);
    assert_eq!(redirect.write(b"one\ntwo\n").unwrap(), 8);
    assert_eq!(shown.lines(), ["one", "two"]);

    let err = redirect.flush().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    redirect.finish().unwrap();
}
