//! Tracing setup.
//!
//! The board UI owns the terminal, so it never logs there: with a log file the
//! events go to that file, otherwise logging is switched off. Every other
//! command logs to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a `-v` count, used when `RUST_LOG` is unset.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "kb=warn",
        1 => "kb=info",
        _ => "kb=debug",
    }
}

/// Open `path` for appending, creating its directory if needed.
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path {} has no file name", path.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held until
/// the process exits.
pub fn init(log_file: Option<&Path>, verbosity: u8, owns_terminal: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    if let Some(path) = log_file {
        let appender = file_appender(path)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .init();
        Ok(Some(guard))
    } else if owns_terminal {
        tracing_subscriber::registry()
            .with(EnvFilter::new("off"))
            .init();
        Ok(None)
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        Ok(None)
    }
}
