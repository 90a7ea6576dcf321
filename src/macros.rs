//! Call-site macros for the per-level logger methods.
//!
//! `info!(logger, "key", value, ...)` expands to
//! `logger.info(&[&"key", &value, ...])`, and `infof!(logger, "{}", x)` to
//! `logger.infof(format_args!("{}", x))`. Positions are unaffected: the
//! methods are `#[track_caller]` and the expansion sits on the calling line.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_pairs {
    ($logger:expr, $method:ident $(, $kv:expr)* $(,)?) => {
        $logger.$method(&[$(&$kv as &dyn ::std::fmt::Display),*])
    };
}

/// Log key/value pairs at `Debug`.
#[macro_export]
macro_rules! debug {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_pairs!($logger, debug $(, $kv)*)
    };
}

/// Log key/value pairs at `Trace`.
#[macro_export]
macro_rules! trace {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_pairs!($logger, trace $(, $kv)*)
    };
}

/// Log key/value pairs at `Info`.
#[macro_export]
macro_rules! info {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_pairs!($logger, info $(, $kv)*)
    };
}

/// Log key/value pairs at `Warn`.
#[macro_export]
macro_rules! warn {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_pairs!($logger, warn $(, $kv)*)
    };
}

/// Log key/value pairs at `Error`.
#[macro_export]
macro_rules! error {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_pairs!($logger, error $(, $kv)*)
    };
}

#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! tracef {
    ($logger:expr, $($arg:tt)+) => {
        $logger.tracef(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(::std::format_args!($($arg)+))
    };
}

/// Create an [`Error`](crate::Error) from a format string, capturing the
/// stack at the macro call.
///
/// ```rust
/// let err = stacklog::new_error!("shard {} unavailable", 3);
/// assert_eq!(err.to_string(), "shard 3 unavailable");
/// ```
#[macro_export]
macro_rules! new_error {
    ($($arg:tt)+) => {
        $crate::Error::format(::std::format_args!($($arg)+))
    };
}
