//! Console logging via `spdlog`.
//!
//! Records below `warn` go to stdout, `warn` and above to stderr, so report
//! output and diagnostics can be separated with a redirect.

use std::sync::Arc;

use spdlog::sink::{StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::settings::{LogLevel, LogSettings};

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

fn add_console_sinks(builder: &mut LoggerBuilder) -> spdlog::Result<()> {
    let stdout = Arc::new(
        StdStreamSink::builder()
            .std_stream(StdStream::Stdout)
            .level_filter(LevelFilter::MoreVerbose(Level::Warn))
            .build()?,
    );

    let stderr = Arc::new(
        StdStreamSink::builder()
            .std_stream(StdStream::Stderr)
            .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
            .build()?,
    );

    builder.sink(stdout).sink(stderr);

    Ok(())
}

/// Build the console logger for `settings` without installing it.
pub fn build_logger(settings: &LogSettings) -> spdlog::Result<Logger> {
    let mut builder = Logger::builder();
    add_console_sinks(&mut builder)?;

    let logger = builder.build()?;
    logger.set_level_filter(LevelFilter::MoreSevereEqual(settings.level.into()));
    Ok(logger)
}

/// Install the console logger as the process-wide default.
pub fn configure_logger(settings: &LogSettings) -> spdlog::Result<()> {
    spdlog::set_default_logger(Arc::new(build_logger(settings)?));
    Ok(())
}
