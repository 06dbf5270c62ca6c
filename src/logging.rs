use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Line mode: human-readable logs on stderr.
pub fn init_stderr_logging(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
        .context("install stderr subscriber")?;
    info!("logging initialized");
    Ok(())
}

/// TUI mode: the terminal belongs to the UI, so logs go to a file.
pub fn init_file_logging(level: &str, path: &Path) -> Result<()> {
    let log_file = Arc::new(
        std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?,
    );
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(log_file),
        )
        .try_init()
        .context("install file subscriber")?;
    info!(path = %path.display(), "logging initialized");
    Ok(())
}
