//! Logging sinks for a run.
//!
//! Three sinks, mirroring the suite's external logger: a console layer,
//! a run log file with everything at the configured level, and a
//! separate error-only file so failures are findable without scrolling
//! the full run log.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::result::EnsayoResult;

/// File receiving the full run log
pub const RUN_LOG_FILE: &str = "test-execution.log";

/// File receiving error-level records only
pub const ERROR_LOG_FILE: &str = "errors.log";

fn open_append(path: &Path) -> EnsayoResult<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber per the logging settings.
///
/// Creates the log directory and both files. Safe to call more than
/// once: a subscriber installed earlier in the process wins and the
/// later call is a no-op.
pub fn init(settings: &LoggingSettings) -> EnsayoResult<()> {
    std::fs::create_dir_all(&settings.path)?;
    let run_log = open_append(&settings.path.join(RUN_LOG_FILE))?;
    let error_log = open_append(&settings.path.join(ERROR_LOG_FILE))?;

    let filter = EnvFilter::try_new(&settings.level)
        .unwrap_or_else(|_| EnvFilter::new(LoggingSettings::default().level));

    let install = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(run_log)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(error_log))
                .with_filter(LevelFilter::ERROR),
        )
        .try_init();

    if install.is_err() {
        tracing::debug!("subscriber already installed, keeping existing sinks");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::LoggingSettings;

    #[test]
    fn test_init_creates_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            path: dir.path().join("logs"),
            level: "debug".to_string(),
        };
        init(&settings).unwrap();
        assert!(settings.path.join(RUN_LOG_FILE).exists());
        assert!(settings.path.join(ERROR_LOG_FILE).exists());
    }

    #[test]
    fn test_bad_level_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            path: dir.path().to_path_buf(),
            level: "not-a-level=oops=".to_string(),
        };
        // Must not error; the filter falls back to the default level
        init(&settings).unwrap();
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            path: dir.path().to_path_buf(),
            level: "info".to_string(),
        };
        init(&settings).unwrap();
        init(&settings).unwrap();
    }
}
