//! Error type that records where a failure entered the program.
//!
//! The full call stack is captured once, when a raw failure is first
//! wrapped. Wrapping a value that is already an [`Error`] hands back the same
//! instance, so later layers can wrap freely on every `return` without
//! truncating or duplicating the original trace.
//!
//! # Example
//!
//! ```rust
//! use stacklog::{Error, ResultExt};
//!
//! fn read_config(path: &str) -> Result<String, Error> {
//!     std::fs::read_to_string(path).traced()
//! }
//!
//! let err = read_config("/definitely/not/here").unwrap_err();
//! let again = Error::wrap(err.clone());
//! assert!(Error::ptr_eq(&err, &again));
//! assert!(err.primary_frame().file().ends_with(".rs"));
//! ```

use crate::location::{self, StackFrame};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Boxed underlying failure held by an [`Error`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A failure plus the call stack captured when it was first wrapped.
///
/// Cloning is cheap and preserves identity (see [`Error::ptr_eq`]).
#[derive(Clone)]
pub struct Error {
    inner: Arc<Inner>,
}

struct Inner {
    /// Oldest call first; never empty.
    stacks: Vec<StackFrame>,
    cause: BoxError,
}

/// Cause used by [`Error::format`] when there is no underlying error value.
#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

impl Error {
    /// Wrap `err`, capturing the stack at the caller.
    ///
    /// If `err` is already an [`Error`] it is returned unchanged.
    #[track_caller]
    pub fn wrap<E: Into<BoxError>>(err: E) -> Self {
        Self::wrap_at(err, location::caller())
    }

    /// Like [`Error::wrap`], with the call site supplied by the caller.
    pub fn wrap_at<E: Into<BoxError>>(err: E, site: StackFrame) -> Self {
        match err.into().downcast::<Error>() {
            Ok(traced) => *traced,
            Err(cause) => Self::capture(cause, site),
        }
    }

    /// Create a new error from a formatted message.
    ///
    /// Usually reached through the [`new_error!`](crate::new_error) macro.
    #[track_caller]
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let site = location::caller();
        Self::capture(Box::new(Message(args.to_string())), site)
    }

    /// Build an error from a trace recorded elsewhere, oldest frame first.
    ///
    /// An empty trace is replaced by a single placeholder frame.
    pub fn from_frames<E: Into<BoxError>>(err: E, mut frames: Vec<StackFrame>) -> Self {
        if frames.is_empty() {
            frames.push(StackFrame::unknown());
        }
        Self {
            inner: Arc::new(Inner {
                stacks: frames,
                cause: err.into(),
            }),
        }
    }

    fn capture(cause: BoxError, site: StackFrame) -> Self {
        let stacks = location::capture_stack(site, &[module_path!()]);
        Self {
            inner: Arc::new(Inner { stacks, cause }),
        }
    }

    /// Every captured frame, oldest call first.
    pub fn stacks(&self) -> &[StackFrame] {
        &self.inner.stacks
    }

    /// The most recent frame: where the failure was wrapped.
    pub fn primary_frame(&self) -> &StackFrame {
        let stacks = &self.inner.stacks;
        &stacks[stacks.len() - 1]
    }

    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.cause.as_ref()
    }

    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.inner.cause.downcast_ref::<T>()
    }

    /// Multi-line trace: a leading newline, then one `\tfile:line` per frame.
    pub fn trace(&self) -> String {
        let mut out = String::from("\n");
        let frames: Vec<String> = self
            .stacks()
            .iter()
            .map(|frame| format!("\t{}", frame))
            .collect();
        out.push_str(&frames.join("\n"));
        out
    }

    /// True when both handles refer to the same captured error.
    pub fn ptr_eq(a: &Error, b: &Error) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// The first [`Error`] in `err`'s source chain, starting with `err`.
    pub fn find<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Error> {
        let mut current = Some(err);
        while let Some(candidate) = current {
            if let Some(traced) = candidate.downcast_ref::<Error>() {
                return Some(traced);
            }
            current = candidate.source();
        }
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.cause, f)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.to_string())
            .field("stacks", &self.inner.stacks)
            .finish()
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.cause.as_ref())
    }
}

/// Wrap an optional failure; `None` stays `None`.
#[track_caller]
pub fn wrap_error<E: Into<BoxError>>(err: Option<E>) -> Option<Error> {
    let site = location::caller();
    err.map(|err| Error::wrap_at(err, site))
}

/// Thread `value` through unchanged while wrapping the optional failure.
#[track_caller]
pub fn wrap_error_with<T, E: Into<BoxError>>(value: T, err: Option<E>) -> (T, Option<Error>) {
    let site = location::caller();
    (value, err.map(|err| Error::wrap_at(err, site)))
}

/// Convert the error side of a `Result` into an [`Error`].
pub trait ResultExt<T> {
    fn traced(self) -> Result<T, Error>;
}

impl<T, E: Into<BoxError>> ResultExt<T> for Result<T, E> {
    #[track_caller]
    fn traced(self) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::wrap(err)),
        }
    }
}
