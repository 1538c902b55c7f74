// file: src/logging/logger.rs
// version: 2.1.0
// guid: 38c0a2f9-d1f9-48f6-a77d-c90a2f59cca0

//! Run logger: timestamped lines to stdout and to a per-run log file

use crate::config::Settings;
use crate::error::PostInstallError;
use crate::Result;
use chrono::Local;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{filter_fn, FilterExt, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Target for captured external command output; written to the log file only
pub const COMMAND_OUTPUT_TARGET: &str = "postinstall::output";

/// Timestamp layout inside the brackets
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats every event as `[<local timestamp>] <message>`
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLineFormat;

impl<S, N> FormatEvent<S, N> for RunLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}] ", Local::now().format(TIMESTAMP_FORMAT))?;

        match *event.metadata().level() {
            Level::ERROR => write!(writer, "ERROR: ")?,
            Level::WARN => write!(writer, "WARNING: ")?,
            _ => {}
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialize the run logger and return the log file path.
///
/// Creating the log directory or file is the one logging failure that is
/// fatal; once the subscriber is installed, write errors are ignored by
/// the fmt layers.
pub fn init_run_logger(settings: &Settings, verbose: bool, quiet: bool) -> Result<PathBuf> {
    fs::create_dir_all(&settings.log_dir).map_err(|e| {
        PostInstallError::logging(format!(
            "Failed to create log directory {}: {}",
            settings.log_dir.display(),
            e
        ))
    })?;

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .map_err(|e| {
            PostInstallError::logging(format!(
                "Failed to open log file {}: {}",
                settings.log_file.display(),
                e
            ))
        })?;

    run_subscriber(io::stdout, Mutex::new(file), verbose, quiet)
        .try_init()
        .map_err(|e| PostInstallError::logging(format!("Failed to initialize logger: {}", e)))?;

    Ok(settings.log_file.clone())
}

/// Two layers sharing `RunLineFormat`: the console one honours `RUST_LOG`
/// and `--quiet` and never sees command output, the file one keeps
/// everything at info (debug with `--verbose`).
fn run_subscriber<O, F>(
    console: O,
    file: F,
    verbose: bool,
    quiet: bool,
) -> impl Subscriber + Send + Sync
where
    O: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    F: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
        .and(filter_fn(|meta| meta.target() != COMMAND_OUTPUT_TARGET));

    let file_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(RunLineFormat)
        .with_writer(console)
        .with_filter(console_filter);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(RunLineFormat)
        .with_ansi(false)
        .with_writer(file)
        .with_filter(file_level);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
}

/// Record captured command output in the log file, one event per line
pub fn log_command_output(stdout: &str, stderr: &str) {
    for line in stdout.lines().chain(stderr.lines()) {
        if !line.trim().is_empty() {
            tracing::info!(target: COMMAND_OUTPUT_TARGET, "{}", line);
        }
    }
}

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, warn};
