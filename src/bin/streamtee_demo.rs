use std::env;
use std::error::Error;
use std::fs::OpenOptions;
use std::io::{self, Write};

use streamtee::{FnDisplay, OutputStream, PumpPolicy, Redirect, TeeConfig};
use tracing_subscriber::EnvFilter;

fn print_usage_and_exit() -> ! {
    eprintln!("Usage:");
    eprintln!("  streamtee_demo <log-file> [every_line|never]");
    eprintln!();
    eprintln!("Reads stdin and writes it to a redirected stderr stream. Each completed");
    eprintln!("line is appended to <log-file> and shown on stdout as a window entry.");
    std::process::exit(1);
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);

    let log_path = match args.next() {
        Some(path) => path,
        None => return Err("missing log file argument".into()),
    };

    let pump = match args.next() {
        Some(arg) => PumpPolicy::from_str(&arg).ok_or_else(|| format!("unknown pump policy '{arg}'"))?,
        None => PumpPolicy::default(),
    };

    if args.next().is_some() {
        return Err("too many arguments".into());
    }

    let mut stream = OutputStream::stderr();
    let mut frames = 0usize;

    {
        let mut log = OpenOptions::new().create(true).append(true).open(&log_path)?;
        let mut window = FnDisplay::new(|line: &str| println!("[window] {line}"));
        let config = TeeConfig::new(stream.id()).with_pump(pump);
        let mut redirect =
            Redirect::install_with(config, &mut stream, &mut log, &mut window, || frames += 1);

        let copied = io::copy(&mut io::stdin().lock(), &mut redirect)?;
        redirect.flush()?;
        redirect.finish()?;
        tracing::debug!(bytes = copied, "stdin drained");
    }

    writeln!(stream, "streamtee_demo: stderr restored")?;
    tracing::info!(log = %log_path, frames, "redirection finished");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("streamtee_demo error: {e}");
        print_usage_and_exit();
    }
}
