//! Process-wide logging setup
//!
//! Logs go to stdout and to a file rotated once a day. Only the newest
//! `max_files` files are kept.

use crate::config::LoggingSettings;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the process exits.
pub fn init(settings: &LoggingSettings) -> Result<WorkerGuard> {
    let appender = file_appender(settings)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}

/// Daily rotated appender with bounded retention
fn file_appender(settings: &LoggingSettings) -> Result<RollingFileAppender> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(settings.file_prefix.as_str())
        .filename_suffix("log")
        .max_log_files(settings.max_files.max(1))
        .build(&settings.directory)?;
    Ok(appender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn test_file_appender_creates_directory() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "websearch-logs-{}-{}",
            std::process::id(),
            nanos
        ));

        let settings = LoggingSettings {
            directory: dir.to_string_lossy().into_owned(),
            ..LoggingSettings::default()
        };

        assert!(file_appender(&settings).is_ok());
        assert!(dir.is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
