//! Leveled logger with ordered structured context.
//!
//! A [`Logger`] holds a minimum level, its own [`FieldMap`] and a shared
//! [`Sink`]. It never changes after construction: [`Logger::fork`] returns a
//! new logger with extra fields and leaves the parent untouched.
//!
//! Each level has four entry points, shown here for `info`:
//!
//! - `info(&[key, value, ...])`: one record with the given fields
//! - `infof(format_args!(...))`: one record with a `msg` field
//! - `info_error(&err)`: one record describing `err`, with its captured
//!   trace when `err` (or anything in its source chain) is an [`Error`]
//! - `info_at(&frame, &[...])`: like `info`, positioned at `frame`
//!
//! All of them are `#[track_caller]`, so the reported position is the line
//! that called the logger, even through further `#[track_caller]` wrappers.
//! Records below the threshold return before the position is resolved or
//! any argument is formatted.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stacklog::{info, Level, Logger};
//! use stacklog::sink::MemorySink;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(Level::Info, Arc::new(sink.clone()), &[&"service", &"api"]).unwrap();
//! let request = logger.fork(&[&"request_id", &42]).unwrap();
//!
//! info!(request, "user", "alice").unwrap();
//! logger.debug(&[&"hidden", &true]).unwrap();
//!
//! let lines = sink.lines();
//! assert_eq!(lines.len(), 1);
//! assert!(lines[0].ends_with("| [service]api | [request_id]42 | user=alice"));
//! ```

use crate::config::LoggerConfig;
use crate::error::Error;
use crate::fields::FieldMap;
use crate::level::Level;
use crate::location::{self, StackFrame};
use crate::log_error::Result;
use crate::render::{render_line, timestamp_now};
use crate::sink::{Sink, StdoutSink};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    threshold: Level,
    fields: FieldMap,
    sink: Arc<dyn Sink>,
    /// Decided once at construction and inherited by forks.
    interactive: bool,
}

macro_rules! level_methods {
    ($level:expr, $plain:ident, $formatted:ident, $error:ident, $at:ident) => {
        #[track_caller]
        pub fn $plain(&self, pairs: &[&dyn fmt::Display]) -> Result<()> {
            self.log($level, pairs)
        }

        #[track_caller]
        pub fn $formatted(&self, args: fmt::Arguments<'_>) -> Result<()> {
            self.logf($level, args)
        }

        #[track_caller]
        pub fn $error(&self, err: &(dyn StdError + 'static)) -> Result<()> {
            self.log_error($level, err)
        }

        pub fn $at(&self, site: &StackFrame, pairs: &[&dyn fmt::Display]) -> Result<()> {
            self.log_at($level, site, pairs)
        }
    };
}

impl Logger {
    /// Create a logger that styles its output when `sink` is stdout/stderr.
    pub fn new(level: Level, sink: Arc<dyn Sink>, fields: &[&dyn fmt::Display]) -> Result<Self> {
        Self::with_config(LoggerConfig::new(level, Default::default()), sink, fields)
    }

    pub fn with_config(
        config: LoggerConfig,
        sink: Arc<dyn Sink>,
        fields: &[&dyn fmt::Display],
    ) -> Result<Self> {
        let fields = FieldMap::from_pairs(fields)?;
        let interactive = config.color.should_style(sink.is_interactive());
        Ok(Self {
            threshold: config.level,
            fields,
            sink,
            interactive,
        })
    }

    /// Stdout logger at `Debug` when `debug` is set, `Info` otherwise.
    pub fn default_logger(debug: bool, fields: &[&dyn fmt::Display]) -> Result<Self> {
        Self::with_config(LoggerConfig::debug(debug), Arc::new(StdoutSink::new()), fields)
    }

    /// Stdout logger configured from the environment.
    pub fn from_env(fields: &[&dyn fmt::Display]) -> Result<Self> {
        Self::with_config(LoggerConfig::from_env(), Arc::new(StdoutSink::new()), fields)
    }

    /// A new logger with the same threshold and sink, whose fields are this
    /// logger's fields overlaid with `pairs`.
    pub fn fork(&self, pairs: &[&dyn fmt::Display]) -> Result<Self> {
        let mut fields = self.fields.clone();
        fields.extend_pairs(pairs)?;
        Ok(Self {
            threshold: self.threshold,
            fields,
            sink: Arc::clone(&self.sink),
            interactive: self.interactive,
        })
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.threshold
    }

    /// Emit one record at `level`, positioned at the caller.
    #[track_caller]
    pub fn log(&self, level: Level, pairs: &[&dyn fmt::Display]) -> Result<()> {
        FieldMap::check_pairs(pairs)?;
        if !self.enabled(level) {
            return Ok(());
        }
        let site = location::caller();
        self.write(level, &site.to_string(), FieldMap::from_pairs(pairs)?)
    }

    /// Emit one record at `level`, positioned at `site`.
    pub fn log_at(&self, level: Level, site: &StackFrame, pairs: &[&dyn fmt::Display]) -> Result<()> {
        FieldMap::check_pairs(pairs)?;
        if !self.enabled(level) {
            return Ok(());
        }
        self.write(level, &site.to_string(), FieldMap::from_pairs(pairs)?)
    }

    /// Emit `args` as the `msg` field.
    #[track_caller]
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) -> Result<()> {
        self.log(level, &[&"msg", &args])
    }

    /// Emit `err`. A captured [`Error`] is positioned at its primary frame
    /// and carries its full trace; anything else is positioned at the caller.
    #[track_caller]
    pub fn log_error(&self, level: Level, err: &(dyn StdError + 'static)) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        match Error::find(err) {
            Some(traced) => self.write_traced(level, traced),
            None => self.log(level, &[&"error", &err]),
        }
    }

    level_methods!(Level::Debug, debug, debugf, debug_error, debug_at);
    level_methods!(Level::Trace, trace, tracef, trace_error, trace_at);
    level_methods!(Level::Info, info, infof, info_error, info_at);
    level_methods!(Level::Warn, warn, warnf, warn_error, warn_at);
    level_methods!(Level::Error, error, errorf, error_error, error_at);

    fn write_traced(&self, level: Level, err: &Error) -> Result<()> {
        let mut local = FieldMap::new();
        local.set("error", err.to_string());
        local.set("stack", err.trace());
        self.write(level, &err.primary_frame().to_string(), local)
    }

    pub(crate) fn write(&self, level: Level, position: &str, local: FieldMap) -> Result<()> {
        let line = render_line(
            level,
            position,
            &self.fields,
            &local,
            &timestamp_now(),
            self.interactive,
        );
        self.sink.write_line(&line)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("fields", &self.fields)
            .field("sink", &self.sink.description())
            .field("interactive", &self.interactive)
            .finish()
    }
}
