/// Log setup
///
/// The TUI owns stdout, so log events go to a file instead. The path comes
/// from `METRICS_DASH_LOG` or defaults to the config directory; the filter
/// from `RUST_LOG` (default `info`).

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::utils::app_config::AppConfig;
use crate::utils::constants::{LOG_FILE_NAME, LOG_PATH_ENV};

pub fn log_path() -> Result<PathBuf> {
    match std::env::var(LOG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(AppConfig::config_dir()?.join(LOG_FILE_NAME)),
    }
}

/// Non-blocking writer appending to exactly `path`. Buffered lines are
/// flushed when the guard drops.
pub fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Invalid log file path {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered events are lost.
pub fn init_logging() -> Result<(PathBuf, WorkerGuard)> {
    let path = log_path()?;
    let (writer, guard) = file_writer(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Invalid log filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Logger already initialized")?;

    Ok((path, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_appends_to_exact_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dash.log");
        std::fs::write(&path, "earlier\n").unwrap();

        let (mut writer, guard) = file_writer(&path).unwrap();
        writer.write_all(b"refresh settled\n").unwrap();
        drop(writer);
        drop(guard);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "earlier\nrefresh settled\n");
    }

    #[test]
    fn test_file_writer_rejects_path_without_file_name() {
        assert!(file_writer(Path::new("/")).is_err());
    }
}
