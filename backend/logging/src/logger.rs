//! Structured Logger
//!
//! Wraps `tracing` with a console layer (plain or JSON), an optional
//! daily-rolling NDJSON file, and `RUST_LOG`-based level control.

use std::path::Path;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "linestash.log";

/// Initialize the global logger.
///
/// `RUST_LOG` overrides `level`. When `log_dir` is set, events are also
/// written as NDJSON to `linestash.log.YYYY-MM-DD` in that directory; a
/// directory that cannot be created is returned as an error.
/// Calling this twice keeps the first subscriber.
pub fn init_logger(log_dir: Option<&Path>, level: &str, json: bool) -> Result<(), InitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer().with_writer(std::io::stdout).with_target(false).with_ansi(true).boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let appender = daily_appender(dir)?;
            Some(fmt::layer().json().with_writer(appender).with_ansi(false))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}

fn daily_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_log_dir_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let dir = file.path().join("logs");
        assert!(daily_appender(&dir).is_err());
        assert!(init_logger(Some(&dir), "info", false).is_err());
    }

    #[test]
    fn appender_creates_missing_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("logs");
        daily_appender(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
