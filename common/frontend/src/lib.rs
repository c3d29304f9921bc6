use std::{fs, io::Write, path::Path};

use termcolor::{ColorChoice, StandardStream};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, prelude::*, registry, EnvFilter};

const RUST_LOG_ENV: &str = "RUST_LOG";

/// Per-frame modules stay at `info` even under a global `RUST_LOG=trace`,
/// until explicitly overwritten, e.g. `RUST_LOG="client::animator=trace"`.
const BASE_DIRECTIVES: &[&str] = &["client::animator=info", "humanoid_headless::scene=info"];

/// Initialise tracing and logging, optionally into `logs_path/file`.
///
/// Sets up a terminal logger and, when a path is given, a daily rolling file
/// logger next to it. If the log directory cannot be created only the
/// terminal logger is installed.
///
/// The logging level defaults to `INFO`. Use the `RUST_LOG` environment
/// variable to change it per crate or module, e.g.
/// `RUST_LOG="client::animator=trace,info"`.
///
/// Keep the returned guards alive for as long as logs should be flushed.
pub fn init<W>(log_path_file: Option<(&Path, &str)>, terminal: W) -> Vec<impl Drop>
where
    W: Write + Send + 'static,
{
    let mut guards: Vec<WorkerGuard> = Vec::new();

    let base_exceptions = |env: EnvFilter| {
        BASE_DIRECTIVES
            .iter()
            .filter_map(|d| d.parse().ok())
            .fold(env, EnvFilter::add_directive)
            .add_directive(LevelFilter::INFO.into())
    };

    let filter = match std::env::var_os(RUST_LOG_ENV).map(|s| s.into_string()) {
        Some(Ok(env)) => {
            let mut filter = base_exceptions(EnvFilter::new(""));
            for s in env.split(',') {
                match s.parse() {
                    Ok(d) => filter = filter.add_directive(d),
                    Err(err) => eprintln!("WARN ignoring log directive: `{}`: {}", s, err),
                };
            }
            filter
        },
        _ => base_exceptions(EnvFilter::from_env(RUST_LOG_ENV)),
    };

    let (non_blocking, stdio_guard) = tracing_appender::non_blocking(terminal);
    guards.push(stdio_guard);
    let registry = registry().with(tracing_subscriber::fmt::layer().with_writer(non_blocking));

    let mut file_setup = None;
    match log_path_file {
        Some((path, file)) => match fs::create_dir_all(path) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(path, file);
                let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);
                guards.push(file_guard);
                file_setup = Some((path, file));
                registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_ansi(false)
                            .with_writer(non_blocking_file),
                    )
                    .with(filter)
                    .init();
            },
            Err(e) => {
                registry.with(filter).init();
                tracing::error!(
                    ?e,
                    "Failed to create log file!. Falling back to terminal logging only.",
                );
            },
        },
        None => registry.with(filter).init(),
    }

    if let Some((path, file)) = file_setup {
        info!(?path, ?file, "Setup terminal and file logging.");
    }

    if tracing::level_enabled!(tracing::Level::TRACE) {
        info!("Tracing Level: TRACE");
    } else if tracing::level_enabled!(tracing::Level::DEBUG) {
        info!("Tracing Level: DEBUG");
    };

    guards
}

pub fn init_stdout(log_path_file: Option<(&Path, &str)>) -> Vec<impl Drop> {
    init(log_path_file, StandardStream::stdout(ColorChoice::Auto))
}
