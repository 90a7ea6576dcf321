//! Routes records from the `log` facade through a [`Logger`].
//!
//! Libraries that log with `log::info!` and friends end up in the same sink
//! with the same layout. The position comes from the record's file and line;
//! the `log` target is kept as a `target` field.

use crate::fields::FieldMap;
use crate::level::Level;
use crate::location::StackFrame;
use crate::logger::Logger;
use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// Install `logger` as the process-wide `log` backend.
///
/// Can only succeed once per process.
pub fn install(logger: Logger) -> Result<(), SetLoggerError> {
    let filter = level_filter(logger.threshold());
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(())
}

/// The loosest `log` filter that still lets every enabled level through.
///
/// `log` orders `Trace` below `Debug`, so a `Debug` or `Trace` threshold
/// admits everything and the final decision is left to [`Logger::enabled`].
pub fn level_filter(threshold: Level) -> LevelFilter {
    match threshold {
        Level::Debug | Level::Trace => LevelFilter::Trace,
        Level::Info => LevelFilter::Info,
        Level::Warn => LevelFilter::Warn,
        Level::Error => LevelFilter::Error,
    }
}

fn record_position(record: &Record<'_>) -> String {
    match (record.file(), record.line()) {
        (Some(file), Some(line)) => StackFrame::new(file, line).to_string(),
        _ => StackFrame::unknown().to_string(),
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        Logger::enabled(self, Level::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        let level = Level::from(record.level());
        if !Logger::enabled(self, level) {
            return;
        }
        let mut local = FieldMap::new();
        local.set("target", record.target());
        local.set("msg", record.args().to_string());
        // `log::Log` has no way to report a failed write
        let _ = self.write(level, &record_position(record), local);
    }

    fn flush(&self) {
        let _ = self.sink().flush();
    }
}
