//! Call-site resolution.
//!
//! Positions come from `#[track_caller]`: every public entry point in this
//! crate carries the attribute, so the location seen by [`caller`] is the
//! expression that called into the logging API, however many wrapper layers
//! sit in between. Code that wraps the API without `#[track_caller]` can
//! hand a [`StackFrame`] down explicitly instead.
//!
//! Full traces for captured errors are taken from the runtime backtrace by
//! [`capture_stack`]; without debug info they degrade to the call site alone.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::path::Path;

const UNKNOWN_FILE: &str = "???";

/// One `(file, line)` snapshot of a call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    file: String,
    line: u32,
}

impl StackFrame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Placeholder used when a position cannot be resolved.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_FILE, 0)
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn is_unknown(&self) -> bool {
        self.file == UNKNOWN_FILE
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl From<&Location<'_>> for StackFrame {
    fn from(location: &Location<'_>) -> Self {
        Self::from_location(location)
    }
}

/// The frame of the expression that (transitively, through
/// `#[track_caller]` functions) called this function.
#[track_caller]
pub fn caller() -> StackFrame {
    StackFrame::from_location(Location::caller())
}

/// Capture the current call stack, oldest call first, ending at `site`.
///
/// Frames belonging to the standard library and to any module named in
/// `internal` (plus this one) are dropped. The result is never empty.
pub fn capture_stack(site: StackFrame, internal: &[&str]) -> Vec<StackFrame> {
    let backtrace = Backtrace::force_capture().to_string();
    let mut modules = Vec::with_capacity(internal.len() + 1);
    modules.push(module_path!());
    modules.extend_from_slice(internal);

    let mut frames: Vec<StackFrame> = parse_backtrace(&backtrace)
        .into_iter()
        .filter(|(symbol, frame)| !is_runtime_frame(frame) && !is_internal(symbol, &modules))
        .map(|(_, frame)| frame)
        .collect();
    frames.reverse();

    // Called through a fn pointer (`.map_err(Error::wrap)`), `#[track_caller]`
    // reports the shim inside core. The newest user frame is the wrap site then.
    if is_runtime_frame(&site) {
        if frames.is_empty() {
            frames.push(StackFrame::unknown());
        }
        return frames;
    }

    // The newest frame matching the call site is replaced by the site itself,
    // so the primary frame is exactly what `#[track_caller]` reported.
    match frames.iter().rposition(|frame| same_site(frame, &site)) {
        Some(index) => {
            frames.truncate(index);
            frames.push(site);
        }
        None => frames.push(site),
    }
    frames
}

/// Parse the text form of a std backtrace into `(symbol, frame)` pairs,
/// newest first. Symbols without a resolved source position are skipped.
fn parse_backtrace(text: &str) -> Vec<(String, StackFrame)> {
    let mut frames = Vec::new();
    let mut symbol: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(position) = line.strip_prefix("at ") {
            if let (Some(name), Some(frame)) = (symbol.take(), parse_position(position)) {
                frames.push((name, frame));
            }
            continue;
        }
        let name = match line.split_once(": ") {
            Some((index, rest)) if index.chars().all(|c| c.is_ascii_digit()) => rest,
            _ => line,
        };
        symbol = Some(name.to_string());
    }
    frames
}

/// `path:line:column` to a frame, dropping the column.
fn parse_position(position: &str) -> Option<StackFrame> {
    let mut parts = position.rsplitn(3, ':');
    let _column = parts.next()?;
    let line = parts.next()?.parse().ok()?;
    let file = parts.next()?;
    let file = file.strip_prefix("./").unwrap_or(file);
    Some(StackFrame::new(file, line))
}

fn is_runtime_frame(frame: &StackFrame) -> bool {
    let file = frame.file();
    file.starts_with("/rustc/")
        || file.contains("/library/std/")
        || file.contains("/library/core/")
        || file.contains("/library/alloc/")
        || file.contains("/library/test/")
}

fn is_internal(symbol: &str, modules: &[&str]) -> bool {
    if symbol.contains("::tests::") {
        return false;
    }
    modules.iter().any(|module| {
        let prefix = format!("{}::", module);
        symbol
            .match_indices(&prefix)
            .any(|(at, _)| is_path_start(&symbol[..at]))
    })
}

/// Whether a path may begin right after `before` in a demangled symbol.
fn is_path_start(before: &str) -> bool {
    before.is_empty() || before.ends_with('<') || before.ends_with("as ") || before.ends_with("::")
}

fn same_site(frame: &StackFrame, site: &StackFrame) -> bool {
    frame.line() == site.line()
        && (Path::new(frame.file()).ends_with(site.file())
            || Path::new(site.file()).ends_with(frame.file()))
}
