//! Tracing setup: the systemd journal on Linux, otherwise a daily log file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directive (`debug`, `timetabler=trace`, ...).
pub const LOG_ENV: &str = "TIMETABLER_LOG";

const LOG_FILE_PREFIX: &str = "timetabler.log";

static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// `$XDG_DATA_HOME/timetabler/logs`, or `./timetabler/logs` without a data directory.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timetabler")
        .join("logs")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. `log_dir` is only used when the journal
/// is unreachable. Fails if a subscriber is already installed.
pub fn init(log_dir: &Path) -> Result<()> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(journal) = tracing_journald::layer() {
            tracing_subscriber::registry()
                .with(filter())
                .with(journal)
                .try_init()?;
            tracing::debug!("Logging to journald");
            return Ok(());
        }
    }

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_WRITER_GUARD.set(guard);

    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false))
        .try_init()?;
    tracing::debug!(dir = %log_dir.display(), "Logging to file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir() {
        let dir = default_log_dir();
        assert!(dir.ends_with("timetabler/logs"));
    }
}
