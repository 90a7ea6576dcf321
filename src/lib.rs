//! Leveled, structured logging with call-site positions, plus an error type
//! that captures its call stack once, when a failure is first wrapped.
//!
//! ```rust
//! use std::sync::Arc;
//! use stacklog::{Error, Level, Logger, ResultExt};
//! use stacklog::sink::MemorySink;
//!
//! fn load(path: &str) -> Result<String, Error> {
//!     std::fs::read_to_string(path).traced()
//! }
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(Level::Debug, Arc::new(sink.clone()), &[&"component", &"loader"]).unwrap();
//!
//! if let Err(err) = load("/no/such/file") {
//!     logger.error_error(&err).unwrap();
//! }
//! assert!(sink.contents().contains("[component]loader"));
//! assert!(sink.contents().contains("stack=\n\t"));
//! ```

// Export modules for library usage
pub mod bridge;
pub mod config;
pub mod error;
pub mod fields;
pub mod level;
pub mod location;
pub mod log_error;
pub mod logger;
mod macros;
pub mod render;
pub mod sink;

// Re-export commonly used types
pub use crate::config::{ColorMode, LoggerConfig};
pub use crate::error::{wrap_error, wrap_error_with, BoxError, Error, ResultExt};
pub use crate::fields::FieldMap;
pub use crate::level::Level;
pub use crate::location::{caller, StackFrame};
pub use crate::log_error::{LogError, Result};
pub use crate::logger::Logger;
pub use crate::sink::{FileSink, MemorySink, Sink, StderrSink, StdoutSink, WriterSink};
